use anyhow::Context;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use en_domain::config::Config;
use en_server::cli::{Cli, Command};
use en_server::session::reaper;
use en_server::state::AppState;
use en_server::{http, stdio};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // Default to stdio when no subcommand is given: this is what an
        // MCP client launches as a subprocess.
        None | Some(Command::Stdio) => {
            init_stdio_tracing();
            let config = Config::from_env();
            let Some(api_key) = config.api_key.clone() else {
                eprintln!(
                    "ENRICHLY_API_KEY is not set. Get an API key from your \
                     Enrichly account settings and export it before starting \
                     the server."
                );
                std::process::exit(1);
            };
            stdio::run(&config, &api_key).await
        }
        Some(Command::Http { port }) => {
            init_tracing();
            let config = Config::from_env();
            run_server(config, port).await
        }
        Some(Command::Version) => {
            println!("enrichly-mcp {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Structured JSON tracing for the HTTP server.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,en_server=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}

/// Compact stderr-only tracing for stdio mode, where stdout belongs to
/// the protocol.
fn init_stdio_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Start the streamable-HTTP server on the given port.
async fn run_server(config: Config, port: u16) -> anyhow::Result<()> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "enrichly-mcp starting");

    if config.api_key.is_some() {
        // Every unauthenticated caller will run on this key.
        tracing::warn!(
            "ENRICHLY_API_KEY fallback is set; requests without an \
             Authorization header will use it"
        );
    }

    let state = AppState::new(config);
    reaper::spawn(state.clone());

    let max_concurrent = std::env::var("ENRICHLY_MAX_CONCURRENT_REQUESTS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(256);
    tracing::info!(max_concurrent, "concurrency limit set");

    let app = http::router(state.clone())
        .layer(tower::limit::ConcurrencyLimitLayer::new(max_concurrent));

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;

    tracing::info!(addr = %addr, "enrichly-mcp listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("axum server error")?;

    // Drain the registry so every adapter sees its closed hook before
    // the process exits.
    let drained = state.registry.drain();
    tracing::info!(count = drained.len(), "draining sessions");
    for session in drained {
        session.adapter().close();
    }

    tracing::info!("shutdown complete");
    Ok(())
}

/// Wait for SIGINT or SIGTERM, then return to trigger graceful shutdown
/// of the Axum server.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to register SIGTERM handler");

        tokio::select! {
            _ = ctrl_c => tracing::info!("received SIGINT, shutting down"),
            _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
        tracing::info!("received SIGINT, shutting down");
    }
}
