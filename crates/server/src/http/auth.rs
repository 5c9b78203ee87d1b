//! Per-request credential resolution.

use axum::http::{header, HeaderMap};

use en_domain::config::Config;
use en_domain::error::{Error, Result};

/// Resolve the API key for one request.
///
/// A `Bearer` token in the `Authorization` header wins; with no header
/// at all the process-wide `ENRICHLY_API_KEY` fallback applies. Any
/// other shape of the header is rejected rather than silently falling
/// back, so a mis-pasted token never runs on someone else's key.
pub fn resolve_credential(headers: &HeaderMap, config: &Config) -> Result<String> {
    match headers.get(header::AUTHORIZATION) {
        Some(value) => {
            let value = value.to_str().map_err(|_| {
                Error::Unauthorized("Authorization header is not valid UTF-8".into())
            })?;
            match value.strip_prefix("Bearer ") {
                Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
                _ => Err(Error::Unauthorized(
                    "malformed Authorization header; expected 'Bearer <api key>'".into(),
                )),
            }
        }
        None => config.api_key.clone().ok_or_else(|| {
            Error::Unauthorized(
                "missing credentials; send 'Authorization: Bearer <api key>' \
                 or set ENRICHLY_API_KEY"
                    .into(),
            )
        }),
    }
}
