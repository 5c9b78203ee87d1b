//! The `/mcp` endpoint: one URL multiplexing many protocol sessions.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use en_domain::error::Error;
use en_mcp::jsonrpc::{JsonRpcResponse, INVALID_REQUEST, PARSE_ERROR};

use crate::http::auth;
use crate::state::AppState;

/// Header carrying the session id, both directions.
pub const SESSION_HEADER: &str = "mcp-session-id";

pub async fn endpoint(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match method {
        Method::POST => post(state, headers, body).await,
        Method::DELETE => delete(state, headers).await,
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

fn session_id_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok())
}

/// One JSON-RPC message in, zero or one out.
async fn post(state: AppState, headers: HeaderMap, body: Bytes) -> Response {
    let credential = match auth::resolve_credential(&headers, &state.config) {
        Ok(credential) => credential,
        Err(Error::Unauthorized(message)) => {
            tracing::debug!(%message, "rejecting unauthenticated request");
            return (StatusCode::UNAUTHORIZED, Json(json!({ "error": message })))
                .into_response();
        }
        Err(err) => {
            tracing::error!(error = %err, "credential resolution failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let message: Value = match serde_json::from_slice(&body) {
        Ok(message) => message,
        Err(err) => {
            let response = JsonRpcResponse::error(
                Value::Null,
                PARSE_ERROR,
                format!("invalid JSON: {err}"),
            );
            return (StatusCode::BAD_REQUEST, Json(response)).into_response();
        }
    };

    // Valid JSON that is not a JSON-RPC message must not cost a
    // session slot.
    if message.get("method").and_then(Value::as_str).is_none() {
        let id = message.get("id").cloned().unwrap_or(Value::Null);
        let response =
            JsonRpcResponse::error(id, INVALID_REQUEST, "invalid request: missing method");
        return (StatusCode::BAD_REQUEST, Json(response)).into_response();
    }

    let (session, is_new) =
        match state.registry.resolve(session_id_header(&headers), &credential) {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::error!(error = %err, "session creation failed");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };
    session.touch();

    let response = match session.adapter().handle(&message).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        // Notification: accepted, nothing to say back.
        None => StatusCode::ACCEPTED.into_response(),
    };

    // The id is advertised only once the handshake actually registered
    // the session; a failed initialize leaves nothing to route to.
    if is_new && state.registry.is_live(session.id()) {
        if let Ok(value) = HeaderValue::from_str(session.id()) {
            let mut response = response;
            response.headers_mut().insert(SESSION_HEADER, value);
            return response;
        }
    }
    response
}

/// Explicit client-initiated teardown.
async fn delete(state: AppState, headers: HeaderMap) -> Response {
    let Some(session_id) = session_id_header(&headers) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("missing {SESSION_HEADER} header") })),
        )
            .into_response();
    };

    match state.registry.get_live(session_id) {
        Some(session) => {
            session.adapter().close();
            StatusCode::NO_CONTENT.into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
