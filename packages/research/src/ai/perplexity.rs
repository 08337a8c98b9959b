//! Perplexity implementation of the [`AnswerService`] trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use research::ai::PerplexityAnswerService;
//!
//! let answers = PerplexityAnswerService::new(Some("pplx-...".into()))
//!     .with_timeout(Duration::from_secs(120));
//! let service = ResearchService::new(store, Arc::new(answers));
//! ```

use std::time::Duration;

use async_trait::async_trait;
use perplexity_client::{clean_payload, PerplexityClient, PerplexityError, StructuredRequest};
use tracing::debug;

use crate::error::{ResearchError, Result};
use crate::security::ApiKey;
use crate::traits::answer::{AnswerRequest, AnswerService};

/// Answer service backed by the Perplexity chat completions API.
///
/// A client is built per call because the key can change per request.
#[derive(Clone)]
pub struct PerplexityAnswerService {
    default_key: Option<ApiKey>,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl PerplexityAnswerService {
    /// Create a service with an optional default key.
    pub fn new(default_key: Option<ApiKey>) -> Self {
        Self {
            default_key,
            base_url: None,
            timeout: None,
        }
    }

    /// Set a custom base URL (for proxies or tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn client_for(&self, request: &AnswerRequest) -> Result<PerplexityClient> {
        let key = request
            .api_key
            .as_ref()
            .or(self.default_key.as_ref())
            .ok_or_else(|| ResearchError::InvalidInput("API key is required".into()))?;

        let mut client = PerplexityClient::new(key.expose());
        if let Some(url) = &self.base_url {
            client = client.with_base_url(url.clone());
        }
        if let Some(timeout) = self.timeout {
            client = client.with_timeout(timeout).map_err(map_error)?;
        }
        Ok(client)
    }
}

#[async_trait]
impl AnswerService for PerplexityAnswerService {
    async fn ask(&self, request: &AnswerRequest) -> Result<String> {
        let client = self.client_for(request)?;

        debug!(
            model = %request.model,
            schema = %request.schema_name,
            "Sending question to Perplexity"
        );

        let raw = client
            .structured_output(StructuredRequest::new(
                request.model.clone(),
                request.system.clone(),
                request.prompt.clone(),
                request.schema.clone(),
            ))
            .await
            .map_err(map_error)?;

        Ok(clean_payload(&raw))
    }
}

fn map_error(err: PerplexityError) -> ResearchError {
    if err.is_auth_failure() {
        return ResearchError::InvalidInput("API key was rejected by the answer service".into());
    }
    match err {
        PerplexityError::MalformedResponse(msg) => ResearchError::UpstreamMalformed(msg),
        PerplexityError::Config(msg) => ResearchError::InvalidInput(msg),
        other => ResearchError::Upstream(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(api_key: Option<ApiKey>) -> AnswerRequest {
        AnswerRequest {
            model: "sonar".into(),
            system: "Be precise and concise.".into(),
            prompt: "Find top influencers".into(),
            schema: serde_json::json!({"type": "object"}),
            schema_name: "InfluencersAnswer".into(),
            api_key,
        }
    }

    #[test]
    fn test_missing_key_is_invalid_input() {
        let service = PerplexityAnswerService::new(None);
        let err = service.client_for(&request(None)).err().unwrap();
        assert!(matches!(err, ResearchError::InvalidInput(_)));
    }

    #[test]
    fn test_request_key_overrides_default() {
        let service = PerplexityAnswerService::new(Some(ApiKey::new("default")))
            .with_base_url("http://localhost:9");
        let client = service
            .client_for(&request(Some(ApiKey::new("override"))))
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:9");
    }

    #[test]
    fn test_error_mapping() {
        assert!(matches!(
            map_error(PerplexityError::MalformedResponse("x".into())),
            ResearchError::UpstreamMalformed(_)
        ));
        assert!(matches!(
            map_error(PerplexityError::Network("down".into())),
            ResearchError::Upstream(_)
        ));
        assert!(matches!(
            map_error(PerplexityError::Timeout),
            ResearchError::Upstream(_)
        ));
        assert!(matches!(
            map_error(PerplexityError::Api {
                status: 401,
                body: "bad key".into()
            }),
            ResearchError::InvalidInput(_)
        ));
    }
}
