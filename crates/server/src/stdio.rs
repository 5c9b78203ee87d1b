//! Stdio transport: newline-delimited JSON-RPC over stdin/stdout.
//!
//! The single implicit session lives for the life of the process, so no
//! registry is involved; the process credential is the session
//! credential. All diagnostics go to stderr — stdout carries protocol
//! frames only.

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use en_domain::config::Config;
use en_mcp::jsonrpc::{JsonRpcResponse, PARSE_ERROR};
use en_mcp::McpEngine;
use en_provider::EnrichClient;

/// Run the stdio loop until EOF.
pub async fn run(config: &Config, api_key: &str) -> anyhow::Result<()> {
    let client = EnrichClient::new(&config.base_url, api_key, config.http_timeout_secs)?;
    let engine = McpEngine::new(client);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut lines = stdin.lines();

    tracing::info!("stdio transport ready");

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(line) {
            Ok(message) => engine.handle_message(&message).await,
            Err(err) => Some(JsonRpcResponse::error(
                Value::Null,
                PARSE_ERROR,
                format!("invalid JSON: {err}"),
            )),
        };

        if let Some(response) = response {
            let mut frame = serde_json::to_vec(&response)?;
            frame.push(b'\n');
            stdout.write_all(&frame).await?;
            stdout.flush().await?;
        }
    }

    tracing::info!("stdin closed, exiting");
    Ok(())
}
