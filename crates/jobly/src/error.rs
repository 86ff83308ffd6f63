//! Error types for jobly

use thiserror::Error;

/// Result type alias for jobly operations
pub type JoblyResult<T> = Result<T, JoblyError>;

/// Errors surfaced to the API layer.
///
/// Every failure raised by the fragment builders is a [`JoblyError::BadRequest`].
/// `NotFound` belongs to the persistence layer that consumes the fragments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoblyError {
    /// Client input error (HTTP 400)
    #[error("{0}")]
    BadRequest(String),

    /// Lookup matched no rows (HTTP 404)
    #[error("{0}")]
    NotFound(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl JoblyError {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// HTTP-style status code for the calling layer.
    pub fn status(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::NotFound(_) => 404,
            Self::Config(_) => 500,
        }
    }

    /// Check if this is a bad request error
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// The human-readable message without any kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(m) | Self::NotFound(m) | Self::Config(m) => m,
        }
    }
}
