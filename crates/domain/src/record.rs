//! Wire types for the Enrichly REST API.
//!
//! Decoding is deliberately tolerant: every field the formatter might
//! render is optional, and `data` accepts either a single record or a
//! list (the provider returns a list for profile lookups and a single
//! object for some email lookups).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Person / company records
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One enriched person record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_email: Option<String>,
    /// Validation status of `business_email` (e.g. "valid", "catch-all").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seniority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phone_numbers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyRecord>,
}

/// Company block attached to a person record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Lookup / verification responses
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Metadata echoed back by the provider with every lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupMeta {
    /// The original input (email or normalized profile URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(default)]
    pub result_count: u64,
}

/// A lookup response: records plus `success`/`cached` flags.
///
/// Transient — produced per call, never stored across requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub cached: bool,
    #[serde(default, deserialize_with = "one_or_many")]
    pub data: Vec<PersonRecord>,
    #[serde(default)]
    pub meta: LookupMeta,
}

impl LookupResponse {
    /// The original input as reported by the provider, if any.
    pub fn input(&self) -> &str {
        self.meta.input.as_deref().unwrap_or("")
    }
}

/// An email-verification response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub cached: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Verdict: "valid", "invalid", "catch-all", "unknown".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Confidence score 0–100, when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

/// Accept a single record, a list, or null for the `data` field.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<PersonRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(serde::de::Error::custom))
            .collect(),
        other => {
            let record = serde_json::from_value(other).map_err(serde::de::Error::custom)?;
            Ok(vec![record])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_accepts_single_object() {
        let raw = r#"{
            "success": true,
            "data": { "full_name": "Ada Lovelace", "business_email": "ada@acme.com" },
            "meta": { "input": "ada@acme.com", "result_count": 1 }
        }"#;
        let resp: LookupResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.data.len(), 1);
        assert_eq!(resp.data[0].full_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(resp.input(), "ada@acme.com");
    }

    #[test]
    fn data_accepts_list() {
        let raw = r#"{ "success": true, "data": [{}, {}] }"#;
        let resp: LookupResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.data.len(), 2);
    }

    #[test]
    fn data_accepts_null_and_missing() {
        let null: LookupResponse =
            serde_json::from_str(r#"{ "success": true, "data": null }"#).unwrap();
        assert!(null.data.is_empty());

        let missing: LookupResponse = serde_json::from_str(r#"{ "success": true }"#).unwrap();
        assert!(missing.data.is_empty());
        assert!(!missing.cached);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let raw = r#"{
            "success": true,
            "credits_remaining": 41,
            "data": [{ "full_name": "X", "confidence": 0.93 }]
        }"#;
        let resp: LookupResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.data[0].full_name.as_deref(), Some("X"));
    }

    #[test]
    fn verify_response_decodes() {
        let raw = r#"{ "success": true, "email": "a@b.com", "status": "valid", "score": 98 }"#;
        let resp: VerifyResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.status.as_deref(), Some("valid"));
        assert_eq!(resp.score, Some(98));
    }
}
