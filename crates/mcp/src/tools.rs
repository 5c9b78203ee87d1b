//! Tool definitions for the enrichment surface.
//!
//! Three tools, fixed contract: agent integrations depend on these
//! names and schemas staying stable.

use crate::jsonrpc::ToolDef;

pub const ENRICH_EMAIL: &str = "enrich_email";
pub const ENRICH_PROFILE: &str = "enrich_profile";
pub const VALIDATE_EMAIL: &str = "validate_email";

/// All tool definitions, in the order they are listed to clients.
pub fn definitions() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: ENRICH_EMAIL.into(),
            description: "Look up a person's professional profile by business email. \
                          Returns name, title, company, location, and optionally \
                          phone numbers. A lookup with no match consumes no credit."
                .into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "email": {
                        "type": "string",
                        "description": "Business email address to look up"
                    },
                    "include_phones": {
                        "type": "boolean",
                        "description": "Include phone numbers in the result",
                        "default": false
                    },
                    "include_company": {
                        "type": "boolean",
                        "description": "Include the full company record",
                        "default": false
                    }
                },
                "required": ["email"]
            }),
        },
        ToolDef {
            name: ENRICH_PROFILE.into(),
            description: "Look up a person by professional-network profile URL. \
                          The URL is normalized (scheme, www. and trailing slash \
                          stripped) before the lookup."
                .into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "profile_url": {
                        "type": "string",
                        "description": "Profile URL, e.g. site.com/in/jane-doe"
                    },
                    "include_phones": {
                        "type": "boolean",
                        "description": "Include phone numbers in the result",
                        "default": false
                    },
                    "include_company": {
                        "type": "boolean",
                        "description": "Include the full company record",
                        "default": false
                    }
                },
                "required": ["profile_url"]
            }),
        },
        ToolDef {
            name: VALIDATE_EMAIL.into(),
            description: "Check whether an email address is deliverable. Returns a \
                          status (valid, invalid, catch-all, unknown) and a \
                          confidence score."
                .into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "email": {
                        "type": "string",
                        "description": "Email address to validate"
                    }
                },
                "required": ["email"]
            }),
        },
    ]
}
