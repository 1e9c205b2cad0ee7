//! Error types for the incident extractor.

use thiserror::Error;

/// Maximum number of characters of raw backend output carried in an error.
pub const EXCERPT_MAX_CHARS: usize = 200;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Malformed response: {reason} (response: {excerpt})")]
    MalformedResponse { excerpt: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Build a `MalformedResponse` carrying a bounded excerpt of `raw`.
    pub fn malformed(raw: &str, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            excerpt: excerpt(raw),
            reason: reason.into(),
        }
    }

    /// Stable snake_case tag for the error kind, used as `error_type` on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Backend(_) => "backend",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::Config(_) => "config",
            Self::Io(_) | Self::Json(_) | Self::Internal(_) => "internal",
        }
    }
}

/// Truncate `raw` to at most [`EXCERPT_MAX_CHARS`] characters, marking the cut.
pub fn excerpt(raw: &str) -> String {
    match raw.char_indices().nth(EXCERPT_MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &raw[..cut]),
        None => raw.to_string(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
