use clap::{Parser, Subcommand};

/// Enrichly MCP server — B2B contact enrichment tools for agents.
#[derive(Debug, Parser)]
#[command(name = "enrichly-mcp", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve MCP over stdio (default when no subcommand is given).
    Stdio,
    /// Serve MCP over streamable HTTP.
    Http {
        /// Port to listen on.
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
    /// Print version information.
    Version,
}
