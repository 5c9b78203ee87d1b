//! Enrichment gateway: the stateless outbound client.
//!
//! Each `EnrichClient` is bound to exactly one API key at construction
//! and is exclusively owned by one session (or by the single stdio
//! engine in local mode). The key is never logged.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use en_domain::error::{Error, Result};
use en_domain::record::{LookupResponse, VerifyResponse};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tool input shapes
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Input for an email lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmailLookupParams {
    pub email: String,
    #[serde(default)]
    pub include_phones: bool,
    #[serde(default)]
    pub include_company: bool,
}

/// Input for a professional-profile URL lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileLookupParams {
    pub profile_url: String,
    #[serde(default)]
    pub include_phones: bool,
    #[serde(default)]
    pub include_company: bool,
}

/// Input for an email validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidateEmailParams {
    pub email: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// URL normalization
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Normalize a profile URL before sending it to the provider: strip the
/// scheme, a leading `www.`, and any trailing slash. Idempotent.
pub fn normalize_profile_url(url: &str) -> String {
    let url = url.trim();
    let url = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let url = url.strip_prefix("www.").unwrap_or(url);
    url.trim_end_matches('/').to_string()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Outbound client for the Enrichly REST API, bound to one API key.
pub struct EnrichClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl EnrichClient {
    /// Build a client for the given base URL and credential.
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    /// Look up a person by business email.
    pub async fn enrich_email(&self, params: &EmailLookupParams) -> Result<LookupResponse> {
        let body = serde_json::json!({
            "email": params.email,
            "include_phones": params.include_phones,
            "include_company": params.include_company,
        });
        self.post_json("/person/by-email", &body).await
    }

    /// Look up a person by professional-profile URL.
    pub async fn enrich_profile(&self, params: &ProfileLookupParams) -> Result<LookupResponse> {
        let body = serde_json::json!({
            "profile_url": normalize_profile_url(&params.profile_url),
            "include_phones": params.include_phones,
            "include_company": params.include_company,
        });
        self.post_json("/person/by-profile", &body).await
    }

    /// Validate a single email address.
    pub async fn validate_email(&self, params: &ValidateEmailParams) -> Result<VerifyResponse> {
        let body = serde_json::json!({ "email": params.email });
        self.post_json("/email/verify", &body).await
    }

    // ── Internal: one authenticated POST, no retries ───────────────

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%path, "calling enrichment provider");

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Http(format!("request to {path} failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| Error::Http(format!("reading response from {path} failed: {e}")))?;

        if !status.is_success() {
            return Err(Error::Gateway(extract_error_message(status.as_u16(), &text)));
        }

        serde_json::from_str(&text)
            .map_err(|e| Error::Gateway(format!("unexpected provider response: {e}")))
    }
}

/// Pull a human-readable message out of a provider error body.
///
/// Tries `{"error":{"message":…}}`, then `{"error":…}` / `{"message":…}`
/// as plain strings, then the raw body, then a generic HTTP-status line.
fn extract_error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(msg) = value
            .pointer("/error/message")
            .and_then(Value::as_str)
            .or_else(|| value.get("error").and_then(Value::as_str))
            .or_else(|| value.get("message").and_then(Value::as_str))
        {
            return msg.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {status}")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_scheme_www_and_slash() {
        assert_eq!(
            normalize_profile_url("https://www.site.com/in/x/"),
            "site.com/in/x"
        );
        assert_eq!(normalize_profile_url("site.com/in/x"), "site.com/in/x");
        assert_eq!(normalize_profile_url("http://site.com/in/x"), "site.com/in/x");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_profile_url("https://www.site.com/in/x/");
        let twice = normalize_profile_url(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn normalize_does_not_touch_inner_www() {
        assert_eq!(
            normalize_profile_url("site.com/in/www.x"),
            "site.com/in/www.x"
        );
    }

    #[test]
    fn error_message_from_nested_error_object() {
        let body = r#"{"error":{"message":"API key is invalid","code":"bad_key"}}"#;
        assert_eq!(extract_error_message(401, body), "API key is invalid");
    }

    #[test]
    fn error_message_from_flat_fields() {
        assert_eq!(
            extract_error_message(429, r#"{"message":"rate limited"}"#),
            "rate limited"
        );
        assert_eq!(
            extract_error_message(402, r#"{"error":"out of credits"}"#),
            "out of credits"
        );
    }

    #[test]
    fn error_message_falls_back_to_raw_body() {
        assert_eq!(extract_error_message(502, "Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn error_message_falls_back_to_status() {
        assert_eq!(extract_error_message(500, "  "), "HTTP 500");
        // Unparseable-as-message JSON also falls through to the raw body.
        assert_eq!(extract_error_message(500, r#"{"oops":1}"#), r#"{"oops":1}"#);
    }

    #[test]
    fn email_params_reject_unknown_fields() {
        let raw = r#"{ "email": "a@b.com", "nope": true }"#;
        assert!(serde_json::from_str::<EmailLookupParams>(raw).is_err());
    }

    #[test]
    fn include_flags_default_to_false() {
        let params: EmailLookupParams =
            serde_json::from_str(r#"{ "email": "a@b.com" }"#).unwrap();
        assert!(!params.include_phones);
        assert!(!params.include_company);
    }
}
