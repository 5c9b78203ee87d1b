/// Shared error type used across all Enrichly crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    /// Missing or unusable caller credential. Surfaced as HTTP 401 in
    /// remote mode and as a startup failure in stdio mode.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Malformed tool input. Always reported as a tool-level error
    /// result, never as a transport failure.
    #[error("validation: {0}")]
    Validation(String),

    /// The enrichment provider returned a non-success response.
    #[error("{0}")]
    Gateway(String),

    #[error("config: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
