//! MCP protocol engine.
//!
//! JSON-RPC 2.0 message types plus the per-session engine that exposes
//! the enrichment operations as callable tools. The engine holds no
//! session state of its own beyond the gateway it was constructed with.

pub mod engine;
pub mod jsonrpc;
pub mod tools;

pub use engine::McpEngine;

/// MCP protocol revision this server speaks.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server identity advertised during `initialize`.
pub const SERVER_NAME: &str = "enrichly-mcp";
