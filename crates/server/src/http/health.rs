//! Liveness probe.

use axum::Json;
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({
        "name": en_mcp::SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
    }))
}
