//! Error taxonomy shared by every docqa crate

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RagError>;

#[derive(Debug, Error)]
pub enum RagError {
    #[error("invalid parameter `{name}`: {message}")]
    InvalidParameter { name: String, message: String },

    #[error("question is empty")]
    EmptyQuery,

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("rate limited: {message}")]
    RateLimited {
        retry_after: Option<Duration>,
        message: String,
    },

    #[error("network error: {0}")]
    TransientNetwork(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to load {}: {message}", path.display())]
    DocumentLoad { path: PathBuf, message: String },

    #[error("vector index unavailable: {0}")]
    IndexUnavailable(String),
}

impl RagError {
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Worth another attempt after a delay
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RagError::RateLimited { .. } | RagError::TransientNetwork(_)
        )
    }

    /// Aborts a whole ingest instead of failing one document
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RagError::AuthenticationFailed(_)
                | RagError::IndexUnavailable(_)
                | RagError::InvalidParameter { .. }
        )
    }
}
