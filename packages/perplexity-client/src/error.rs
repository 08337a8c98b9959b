//! Errors returned by [`crate::PerplexityClient`].

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PerplexityError>;

#[derive(Debug, Error)]
pub enum PerplexityError {
    /// The HTTP client could not be built
    #[error("Perplexity client misconfigured: {0}")]
    Config(String),

    /// The request did not finish within the client timeout
    #[error("Perplexity request timed out")]
    Timeout,

    /// Connection or transport failure
    #[error("Perplexity unreachable: {0}")]
    Network(String),

    /// Non-2xx status from the API
    #[error("Perplexity returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The body carried no usable answer text
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl PerplexityError {
    /// The API refused the key.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. })
    }

    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
