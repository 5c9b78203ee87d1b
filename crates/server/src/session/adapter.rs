//! Per-session transport adapter.
//!
//! Terminates one request/response exchange at a time against the
//! session's engine. Frames for the same session are serialized by
//! `frame_lock`, so same-session requests are handled in arrival order
//! while different sessions run fully concurrently.
//!
//! The adapter fires exactly one `initialized` and one `closed` hook
//! per session lifetime; those hooks are its only writes against the
//! Session Registry.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Weak;

use serde_json::Value;
use tokio::sync::Mutex;

use en_mcp::jsonrpc::{JsonRpcResponse, INVALID_REQUEST};
use en_mcp::McpEngine;

use crate::session::registry::SessionRegistry;

const STATE_CREATED: u8 = 0;
const STATE_INITIALIZED: u8 = 1;
const STATE_CLOSED: u8 = 2;

/// Registry callbacks for one session, keyed by its id.
///
/// Holds the registry weakly: the registry owns the sessions, not the
/// other way round.
pub struct SessionHooks {
    registry: Weak<SessionRegistry>,
    session_id: String,
}

impl SessionHooks {
    pub fn new(registry: Weak<SessionRegistry>, session_id: String) -> Self {
        Self {
            registry,
            session_id,
        }
    }

    fn initialized(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.activate(&self.session_id);
        }
    }

    fn closed(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.release(&self.session_id);
        }
    }
}

/// One session's transport endpoint.
pub struct TransportAdapter {
    engine: McpEngine,
    /// Serializes whole frames so same-session requests cannot
    /// interleave.
    frame_lock: Mutex<()>,
    state: AtomicU8,
    hooks: SessionHooks,
}

impl TransportAdapter {
    pub(crate) fn new(engine: McpEngine, hooks: SessionHooks) -> Self {
        Self {
            engine,
            frame_lock: Mutex::new(()),
            state: AtomicU8::new(STATE_CREATED),
            hooks,
        }
    }

    /// Frame one protocol message through the engine.
    ///
    /// A successful `initialize` promotes the session in the registry;
    /// a failed one tears it down so a half-open session never becomes
    /// routable. Returns `None` when the message needs no response.
    pub async fn handle(&self, message: &Value) -> Option<JsonRpcResponse> {
        let _frame = self.frame_lock.lock().await;

        if self.state.load(Ordering::SeqCst) == STATE_CLOSED {
            let id = message.get("id").cloned().unwrap_or(Value::Null);
            return Some(JsonRpcResponse::error(id, INVALID_REQUEST, "session is closed"));
        }

        let is_initialize =
            message.get("method").and_then(Value::as_str) == Some("initialize");

        let response = self.engine.handle_message(message).await;

        if is_initialize {
            match &response {
                Some(resp) if !resp.is_error() => {
                    if self
                        .state
                        .compare_exchange(
                            STATE_CREATED,
                            STATE_INITIALIZED,
                            Ordering::SeqCst,
                            Ordering::SeqCst,
                        )
                        .is_ok()
                    {
                        self.hooks.initialized();
                    }
                }
                _ => self.close(),
            }
        }

        response
    }

    /// Terminate the session: explicit close, detected disconnect, idle
    /// eviction, or shutdown drain. The `closed` hook fires at most
    /// once, however many paths race here.
    pub fn close(&self) {
        if self.state.swap(STATE_CLOSED, Ordering::SeqCst) != STATE_CLOSED {
            self.hooks.closed();
        }
    }

    /// True once the session completed its handshake and has not been
    /// closed.
    pub fn is_initialized(&self) -> bool {
        self.state.load(Ordering::SeqCst) == STATE_INITIALIZED
    }
}
