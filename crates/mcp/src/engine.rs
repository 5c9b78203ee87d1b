//! The per-session protocol engine.
//!
//! One engine per session, bound at construction to one `EnrichClient`
//! (and therefore one credential). The engine dispatches JSON-RPC
//! methods; it does not know or care which transport framed them.

use serde::Deserialize;
use serde_json::Value;

use en_domain::error::Error;
use en_provider::{
    format, EmailLookupParams, EnrichClient, ProfileLookupParams, ValidateEmailParams,
};

use crate::jsonrpc::{
    JsonRpcRequest, JsonRpcResponse, ToolCallResult, INVALID_PARAMS, INVALID_REQUEST,
    METHOD_NOT_FOUND,
};
use crate::{tools, PROTOCOL_VERSION, SERVER_NAME};

/// Parameters of a `tools/call` request.
#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Protocol engine for one session.
pub struct McpEngine {
    client: EnrichClient,
}

impl McpEngine {
    pub fn new(client: EnrichClient) -> Self {
        Self { client }
    }

    /// Handle one decoded JSON-RPC message.
    ///
    /// Returns `None` for notifications. A message that is not a
    /// JSON-RPC request at all is answered with `-32600`, echoing its
    /// id when it has one and null otherwise — a notification always
    /// has a method, so there is nothing here to stay silent for.
    pub async fn handle_message(&self, raw: &Value) -> Option<JsonRpcResponse> {
        let req: JsonRpcRequest = match serde_json::from_value(raw.clone()) {
            Ok(req) => req,
            Err(e) => {
                let id = raw.get("id").cloned().unwrap_or(Value::Null);
                return Some(JsonRpcResponse::error(
                    id,
                    INVALID_REQUEST,
                    format!("invalid request: {e}"),
                ));
            }
        };

        if req.jsonrpc != "2.0" {
            let id = req.id?;
            return Some(JsonRpcResponse::error(
                id,
                INVALID_REQUEST,
                "unsupported jsonrpc version",
            ));
        }

        // Notifications never get a response, whatever the method.
        if req.is_notification() {
            tracing::debug!(method = %req.method, "notification received");
            return None;
        }
        let id = req.id.clone().unwrap_or(Value::Null);

        tracing::debug!(method = %req.method, "dispatching request");
        let resp = match req.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, self.initialize_result()),
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => JsonRpcResponse::success(
                id,
                serde_json::json!({ "tools": tools::definitions() }),
            ),
            "tools/call" => self.tools_call(id, req.params).await,
            other => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            ),
        };
        Some(resp)
    }

    fn initialize_result(&self) -> Value {
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            },
        })
    }

    // ── tools/call ─────────────────────────────────────────────────

    async fn tools_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams =
            match serde_json::from_value(params.unwrap_or(Value::Null)) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        INVALID_PARAMS,
                        format!("invalid tools/call params: {e}"),
                    );
                }
            };

        let result = self.dispatch_tool(&params.name, params.arguments).await;
        tracing::debug!(tool = %params.name, is_error = result.is_error, "tool call finished");

        match serde_json::to_value(&result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(
                id,
                crate::jsonrpc::INTERNAL_ERROR,
                format!("encoding tool result: {e}"),
            ),
        }
    }

    /// Run one tool. Every failure — malformed arguments, provider
    /// rejection, network trouble — becomes an error-flagged tool
    /// result rather than a transport failure.
    async fn dispatch_tool(&self, name: &str, arguments: Value) -> ToolCallResult {
        match name {
            tools::ENRICH_EMAIL => {
                let params: EmailLookupParams = match parse_args(arguments) {
                    Ok(p) => p,
                    Err(r) => return r,
                };
                match self.client.enrich_email(&params).await {
                    Ok(resp) => ToolCallResult::text(format::format_lookup(&resp)),
                    Err(e) => tool_error(e),
                }
            }
            tools::ENRICH_PROFILE => {
                let params: ProfileLookupParams = match parse_args(arguments) {
                    Ok(p) => p,
                    Err(r) => return r,
                };
                match self.client.enrich_profile(&params).await {
                    Ok(resp) => ToolCallResult::text(format::format_lookup(&resp)),
                    Err(e) => tool_error(e),
                }
            }
            tools::VALIDATE_EMAIL => {
                let params: ValidateEmailParams = match parse_args(arguments) {
                    Ok(p) => p,
                    Err(r) => return r,
                };
                match self.client.validate_email(&params).await {
                    Ok(resp) => ToolCallResult::text(format::format_verification(&resp)),
                    Err(e) => tool_error(e),
                }
            }
            other => ToolCallResult::error(format!("Unknown tool: {other}")),
        }
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(
    arguments: Value,
) -> Result<T, ToolCallResult> {
    serde_json::from_value(arguments)
        .map_err(|e| ToolCallResult::error(format!("Invalid arguments: {e}")))
}

fn tool_error(e: Error) -> ToolCallResult {
    match e {
        Error::Gateway(msg) => ToolCallResult::error(format!("Enrichment failed: {msg}")),
        other => ToolCallResult::error(other.to_string()),
    }
}
