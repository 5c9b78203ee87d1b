//! Runtime configuration, resolved from the environment.
//!
//! There is no config file: the server is configured entirely through
//! environment variables plus the CLI port flag, so `Config` is a plain
//! snapshot taken once at startup.

use serde::Serialize;

/// Default trusted web origins for the `/mcp` endpoint. Server-to-server
/// callers send no `Origin` header and are always allowed.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "https://claude.ai",
    "https://app.enrichly.io",
];

/// Base URL of the Enrichly REST API.
pub const DEFAULT_BASE_URL: &str = "https://api.enrichly.io/v1";

const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 1800;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Startup configuration snapshot.
///
/// `api_key` doubles as the stdio-mode credential and the HTTP-mode
/// fallback for requests that carry no `Authorization` header. The
/// fallback is a single-tenant convenience: setting it on a shared
/// deployment hands one tenant's key to every unauthenticated caller.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Process-wide Enrichly API key, from `ENRICHLY_API_KEY`.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Enrichment provider base URL, from `ENRICHLY_BASE_URL`.
    pub base_url: String,
    /// Origins allowed to call `/mcp` from a browser context.
    pub allowed_origins: Vec<String>,
    /// Seconds of inactivity after which a session is evicted.
    pub session_idle_timeout_secs: u64,
    /// Outbound provider call timeout, seconds.
    pub http_timeout_secs: u64,
}

impl Config {
    /// Build a config from the process environment.
    pub fn from_env() -> Self {
        let api_key = std::env::var("ENRICHLY_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let base_url = std::env::var("ENRICHLY_BASE_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let allowed_origins = std::env::var("ENRICHLY_ALLOWED_ORIGINS")
            .ok()
            .map(|raw| parse_origins(&raw))
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_origins);

        let session_idle_timeout_secs = env_u64(
            "ENRICHLY_SESSION_IDLE_SECS",
            DEFAULT_IDLE_TIMEOUT_SECS,
        );

        Self {
            api_key,
            base_url,
            allowed_origins,
            session_idle_timeout_secs,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }

    /// True when the given `Origin` header value is on the allow-list.
    pub fn origin_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|o| o == origin)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            allowed_origins: default_origins(),
            session_idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

fn default_origins() -> Vec<String> {
    DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect()
}

/// Parse a comma-separated origin list, dropping empty entries.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}

fn env_u64(name: &str, default: u64) -> u64 {
    match std::env::var(name).ok().map(|v| v.parse::<u64>()) {
        Some(Ok(n)) => n,
        Some(Err(_)) => {
            tracing::warn!(var = name, "ignoring non-numeric value");
            default
        }
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_origins_splits_and_trims() {
        let origins = parse_origins("https://a.example, https://b.example/ ,,");
        assert_eq!(origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn default_config_has_trusted_origins() {
        let config = Config::default();
        assert!(config.origin_allowed("https://claude.ai"));
        assert!(!config.origin_allowed("https://evil.example"));
    }

    #[test]
    fn origin_match_is_exact() {
        let config = Config::default();
        assert!(!config.origin_allowed("https://claude.ai.evil.example"));
    }
}
