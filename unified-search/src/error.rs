//! Error types for the unified-search crate.
//!
//! Adapter errors never leave the adapter boundary (they are logged and
//! turned into an empty contribution), so these variants mostly surface in
//! logs and in direct calls to [`crate::SourceAdapter::fetch`]. Messages never
//! contain credentials.

/// Errors that can occur while querying a knowledge source.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// An HTTP request to a source failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A request to a source exceeded its per-call timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// A source answered with a body that does not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// The source is not configured (missing credentials or base URL) or the
    /// configuration is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// An unexpected defect inside the pipeline.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SearchError {
    /// Classify a [`reqwest::Error`], keeping timeouts distinct from other
    /// transport failures.
    pub fn from_reqwest(context: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(format!("{context}: {err}"))
        } else if err.is_decode() {
            Self::Parse(format!("{context}: {err}"))
        } else {
            Self::Http(format!("{context}: {err}"))
        }
    }
}

/// Convenience type alias for unified-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
