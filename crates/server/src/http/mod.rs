//! The HTTP front door: CORS, credential extraction, session routing.

pub mod auth;
pub mod cors;
pub mod health;
pub mod mcp;

use axum::middleware;
use axum::routing::{any, get};
use axum::Router;

use crate::state::AppState;

/// Build the full router.
///
/// The CORS middleware is the outermost layer so that `OPTIONS`
/// preflights short-circuit before any auth or session logic runs.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/mcp", any(mcp::endpoint))
        .route("/health", get(health::health))
        .layer(middleware::from_fn_with_state(state.clone(), cors::apply))
        .with_state(state)
}
