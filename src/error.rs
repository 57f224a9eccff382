//! Error types for the gateway.

use unified_search::SearchError;

/// Top-level error type for the gateway process.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration file or environment error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP server error (bind, serve).
    #[error("server error: {0}")]
    Server(String),

    /// Search pipeline setup error.
    #[error("search error: {0}")]
    Search(#[from] SearchError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, GatewayError>;
