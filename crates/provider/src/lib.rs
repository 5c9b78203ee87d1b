//! Outbound client for the Enrichly REST API and the result formatter.
//!
//! The client is stateless beyond its bound credential: one provider
//! call per invocation, no retries, no caching. Session state lives
//! entirely in the server crate.

pub mod client;
pub mod format;

pub use client::{
    normalize_profile_url, EmailLookupParams, EnrichClient, ProfileLookupParams,
    ValidateEmailParams,
};
