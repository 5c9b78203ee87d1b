//! Idle-session eviction.
//!
//! Sessions are process-local and clients are under no obligation to
//! close them, so an unreaped registry grows without bound. The reaper
//! walks the registry on an interval and closes anything idle past the
//! configured timeout.

use std::time::Duration;

use crate::state::AppState;

const REAP_INTERVAL_SECS: u64 = 60;

/// Spawn the background eviction loop.
pub fn spawn(state: AppState) -> tokio::task::JoinHandle<()> {
    let idle_timeout = Duration::from_secs(state.config.session_idle_timeout_secs);
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(Duration::from_secs(REAP_INTERVAL_SECS));
        loop {
            interval.tick().await;
            let reaped = state.registry.reap_idle(idle_timeout);
            if reaped.is_empty() {
                continue;
            }
            tracing::info!(count = reaped.len(), "evicting idle sessions");
            for session in reaped {
                tracing::debug!(
                    session_id = %session.id(),
                    age = ?session.age(),
                    "evicting idle session"
                );
                // close() releases via the adapter's single closed hook;
                // the registry entry is already gone, so this is a no-op
                // there, but it marks the adapter unusable for any caller
                // still holding the session.
                session.adapter().close();
            }
        }
    })
}
