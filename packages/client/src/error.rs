//! Error types for the portal client.

use thiserror::Error;

/// Result type for portal client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Portal client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx API response, carrying the server's error category
    /// (`validation_error`, `conflict_error`, ...) and message.
    #[error("{category}: {message}")]
    Api {
        status: u16,
        category: String,
        message: String,
    },

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Source link could not be turned into theme content.
    #[error("{0}")]
    Source(String),
}

impl ClientError {
    /// The server-reported error category, when this is an API error.
    pub fn category(&self) -> Option<&str> {
        match self {
            ClientError::Api { category, .. } => Some(category),
            _ => None,
        }
    }
}
