//! The session registry: a concurrency-safe map from session id to
//! `{ transport, engine, credential }`.
//!
//! A session is created on the first request that carries no recognized
//! session id, but it only becomes routable once its Transport Adapter
//! fires the `initialized` callback — the single authoritative point of
//! registration. Until then it sits in the `pending` map, which also
//! reserves the identifier so id generation and registration share one
//! critical section.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use en_domain::config::Config;
use en_domain::error::Result;
use en_mcp::McpEngine;
use en_provider::EnrichClient;

use crate::session::adapter::{SessionHooks, TransportAdapter};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One live (or pending) session.
///
/// The engine and transport are exclusively owned; the credential is
/// fixed at creation and governs every enrichment call issued through
/// this session, whatever credential later requests happen to carry.
pub struct Session {
    id: String,
    credential: String,
    adapter: Arc<TransportAdapter>,
    created_at: Instant,
    last_seen: Mutex<Instant>,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The credential captured at creation. Never log this.
    pub fn credential(&self) -> &str {
        &self.credential
    }

    pub fn adapter(&self) -> &Arc<TransportAdapter> {
        &self.adapter
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Record activity, deferring idle eviction.
    pub fn touch(&self) {
        *self.last_seen.lock() = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_seen.lock().elapsed()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Registry
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Default)]
struct Inner {
    /// Initialized, routable sessions.
    live: HashMap<String, Arc<Session>>,
    /// Created but not yet initialized. Entries here reserve their id.
    pending: HashMap<String, Arc<Session>>,
}

/// Concurrency-safe session table. The sole arbiter of id uniqueness.
pub struct SessionRegistry {
    config: Arc<Config>,
    inner: Mutex<Inner>,
}

impl SessionRegistry {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Route to an existing session or create a new one.
    ///
    /// For a recognized id the supplied credential is ignored — the
    /// session's original credential governs. For an absent or unmapped
    /// id a fresh session is created, bound to `credential`, and left
    /// pending until its adapter reports a successful handshake.
    ///
    /// Returns the session and whether it was newly created.
    pub fn resolve(
        self: &Arc<Self>,
        session_id: Option<&str>,
        credential: &str,
    ) -> Result<(Arc<Session>, bool)> {
        if let Some(id) = session_id {
            if let Some(existing) = self.inner.lock().live.get(id) {
                existing.touch();
                return Ok((existing.clone(), false));
            }
            tracing::debug!(session_id = %id, "unknown session id, creating a fresh session");
        }

        // Built before taking the lock; fails without leaving any trace
        // in the registry.
        let client = EnrichClient::new(
            &self.config.base_url,
            credential,
            self.config.http_timeout_secs,
        )?;
        let engine = McpEngine::new(client);

        let mut inner = self.inner.lock();

        // Id generation shares the registration critical section, so no
        // two callers can both believe they created a given id.
        let id = loop {
            let candidate = uuid::Uuid::new_v4().to_string();
            if !inner.live.contains_key(&candidate) && !inner.pending.contains_key(&candidate) {
                break candidate;
            }
        };

        let adapter = Arc::new(TransportAdapter::new(
            engine,
            SessionHooks::new(Arc::downgrade(self), id.clone()),
        ));
        let now = Instant::now();
        let session = Arc::new(Session {
            id: id.clone(),
            credential: credential.to_string(),
            adapter,
            created_at: now,
            last_seen: Mutex::new(now),
        });

        inner.pending.insert(id.clone(), session.clone());
        drop(inner);

        tracing::debug!(session_id = %id, "session created, awaiting handshake");
        Ok((session, true))
    }

    /// Promote a pending session to live. Called exactly once per
    /// session, from the adapter's `initialized` callback.
    pub fn activate(&self, session_id: &str) {
        let mut inner = self.inner.lock();
        if let Some(session) = inner.pending.remove(session_id) {
            inner.live.insert(session_id.to_string(), session);
            drop(inner);
            tracing::info!(session_id = %session_id, "session established");
        }
    }

    /// Remove a session mapping. Idempotent: unknown and already
    /// released ids are a no-op.
    pub fn release(&self, session_id: &str) {
        let mut inner = self.inner.lock();
        let removed =
            inner.pending.remove(session_id).is_some() | inner.live.remove(session_id).is_some();
        drop(inner);
        if removed {
            tracing::info!(session_id = %session_id, "session released");
        }
    }

    /// Look up a live session without touching it.
    pub fn get_live(&self, session_id: &str) -> Option<Arc<Session>> {
        self.inner.lock().live.get(session_id).cloned()
    }

    pub fn is_live(&self, session_id: &str) -> bool {
        self.inner.lock().live.contains_key(session_id)
    }

    /// Total number of tracked sessions, pending included.
    pub fn len(&self) -> usize {
        let inner = self.inner.lock();
        inner.live.len() + inner.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove and return every session idle longer than `timeout`.
    /// Pending sessions whose handshake never completed are reaped by
    /// the same rule.
    pub fn reap_idle(&self, timeout: Duration) -> Vec<Arc<Session>> {
        let mut inner = self.inner.lock();
        let Inner { live, pending } = &mut *inner;
        let mut reaped = Vec::new();
        for map in [live, pending] {
            let expired: Vec<String> = map
                .iter()
                .filter(|(_, s)| s.idle_for() > timeout)
                .map(|(id, _)| id.clone())
                .collect();
            for id in expired {
                if let Some(session) = map.remove(&id) {
                    reaped.push(session);
                }
            }
        }
        reaped
    }

    /// Remove and return every session. Shutdown drain path.
    pub fn drain(&self) -> Vec<Arc<Session>> {
        let mut inner = self.inner.lock();
        let Inner { live, pending } = &mut *inner;
        live.drain()
            .chain(pending.drain())
            .map(|(_, s)| s)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Arc<SessionRegistry> {
        let config = Config {
            base_url: "http://127.0.0.1:1".into(),
            ..Config::default()
        };
        Arc::new(SessionRegistry::new(Arc::new(config)))
    }

    fn initialize_msg() -> serde_json::Value {
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": { "name": "test", "version": "0" }
            }
        })
    }

    #[test]
    fn concurrent_creation_yields_distinct_ids() {
        let registry = registry();
        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = registry.clone();
            handles.push(std::thread::spawn(move || {
                (0..25)
                    .map(|_| registry.resolve(None, "key").unwrap().0.id().to_string())
                    .collect::<Vec<_>>()
            }));
        }

        let ids: std::collections::HashSet<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(ids.len(), 200);
        assert_eq!(registry.len(), 200);
    }

    #[tokio::test]
    async fn session_registers_only_after_handshake() {
        let registry = registry();
        let (session, is_new) = registry.resolve(None, "key").unwrap();
        assert!(is_new);
        assert!(!registry.is_live(session.id()));
        assert!(!session.adapter().is_initialized());

        let resp = session.adapter().handle(&initialize_msg()).await.unwrap();
        assert!(!resp.is_error());
        assert!(registry.is_live(session.id()));
        assert!(session.adapter().is_initialized());
    }

    #[tokio::test]
    async fn failed_handshake_never_registers() {
        let registry = registry();
        let (session, _) = registry.resolve(None, "key").unwrap();

        // Wrong jsonrpc version: the engine rejects the handshake.
        let bad = serde_json::json!({
            "jsonrpc": "1.0", "id": 1, "method": "initialize"
        });
        let resp = session.adapter().handle(&bad).await.unwrap();
        assert!(resp.is_error());
        assert!(!registry.is_live(session.id()));
        assert_eq!(registry.len(), 0);
    }

    #[tokio::test]
    async fn credential_is_pinned_at_creation() {
        let registry = registry();
        let (session, _) = registry.resolve(None, "alice-key").unwrap();
        session.adapter().handle(&initialize_msg()).await;

        let (routed, is_new) = registry
            .resolve(Some(session.id()), "mallory-key")
            .unwrap();
        assert!(!is_new);
        assert_eq!(routed.credential(), "alice-key");
        assert_eq!(routed.id(), session.id());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unknown_session_id_creates_fresh_session() {
        let registry = registry();
        let (session, is_new) = registry.resolve(Some("no-such-id"), "key").unwrap();
        assert!(is_new);
        assert_ne!(session.id(), "no-such-id");
    }

    #[tokio::test]
    async fn release_is_idempotent() {
        let registry = registry();
        let (session, _) = registry.resolve(None, "key").unwrap();
        session.adapter().handle(&initialize_msg()).await;
        assert_eq!(registry.len(), 1);

        registry.release(session.id());
        assert_eq!(registry.len(), 0);
        registry.release(session.id());
        registry.release("never-existed");
        assert_eq!(registry.len(), 0);
    }

    #[tokio::test]
    async fn close_fires_release_exactly_once() {
        let registry = registry();
        let (session, _) = registry.resolve(None, "key").unwrap();
        session.adapter().handle(&initialize_msg()).await;
        assert!(registry.is_live(session.id()));

        session.adapter().close();
        assert!(!registry.is_live(session.id()));

        // A second close must not release anything else.
        session.adapter().close();
        assert_eq!(registry.len(), 0);
    }

    #[tokio::test]
    async fn closed_session_rejects_further_frames() {
        let registry = registry();
        let (session, _) = registry.resolve(None, "key").unwrap();
        session.adapter().handle(&initialize_msg()).await;
        session.adapter().close();
        assert!(!session.adapter().is_initialized());

        let resp = session
            .adapter()
            .handle(&serde_json::json!({ "jsonrpc": "2.0", "id": 2, "method": "ping" }))
            .await
            .unwrap();
        assert!(resp.is_error());
    }

    #[tokio::test]
    async fn reaper_evicts_idle_and_stale_pending_sessions() {
        let registry = registry();
        let (live, _) = registry.resolve(None, "key").unwrap();
        live.adapter().handle(&initialize_msg()).await;
        let (_pending, _) = registry.resolve(None, "key").unwrap();
        assert_eq!(registry.len(), 2);

        // Nothing is idle yet.
        assert!(registry.reap_idle(Duration::from_secs(60)).is_empty());

        let reaped = registry.reap_idle(Duration::ZERO);
        assert_eq!(reaped.len(), 2);
        assert_eq!(registry.len(), 0);
    }

    #[tokio::test]
    async fn drain_empties_the_registry() {
        let registry = registry();
        for _ in 0..3 {
            let (s, _) = registry.resolve(None, "key").unwrap();
            s.adapter().handle(&initialize_msg()).await;
        }
        let drained = registry.drain();
        assert_eq!(drained.len(), 3);
        assert!(registry.is_empty());
    }
}
