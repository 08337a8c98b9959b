//! Answer-service API keys.
//!
//! Keys arrive from the environment or from individual requests. Both paths
//! go through [`ApiKey::non_empty`], and the value only leaves the `secrecy`
//! wrapper when a request header is built.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// API key for the answer service. Debug output never shows the value.
pub struct ApiKey(SecretString);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    /// Trimmed key, or `None` when the value is missing or blank.
    pub fn non_empty(value: Option<String>) -> Option<Self> {
        let trimmed = value?.trim().to_string();
        (!trimmed.is_empty()).then(|| Self::new(trimmed))
    }

    /// The raw key, for the `Authorization` header only.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for ApiKey {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&"[REDACTED]").finish()
    }
}

impl From<String> for ApiKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for ApiKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
