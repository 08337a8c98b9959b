//! Typed errors for the research library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can map
//! each failure class to a response.

use thiserror::Error;

/// Errors that can occur while discovering, validating or persisting research.
#[derive(Debug, Error)]
pub enum ResearchError {
    /// A required identifier or parameter was missing or unusable
    #[error("{0}")]
    InvalidInput(String),

    /// An identifier did not resolve
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The answer service returned unparseable or schema-violating content
    #[error("Invalid response from answer service: {0}")]
    UpstreamMalformed(String),

    /// The answer service could not be reached or rejected the request
    #[error("Answer service error: {0}")]
    Upstream(String),

    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ResearchError {
    /// Shorthand for a `NotFound` error.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Wrap any storage backend error.
    pub fn storage(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage(err.into())
    }
}

/// Result type alias for research operations.
pub type Result<T> = std::result::Result<T, ResearchError>;
