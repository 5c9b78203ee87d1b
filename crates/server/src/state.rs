use std::sync::Arc;

use en_domain::config::Config;

use crate::session::registry::SessionRegistry;

/// Shared application state passed to all HTTP handlers.
///
/// The Session Registry is the only mutable state shared across
/// concurrent requests; everything else is a startup snapshot.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        Self {
            registry: Arc::new(SessionRegistry::new(config.clone())),
            config,
        }
    }
}
