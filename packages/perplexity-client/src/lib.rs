//! Pure Perplexity REST API client
//!
//! A minimal client for the Perplexity chat completions API with no
//! domain-specific logic. Sends JSON-schema constrained requests and hands
//! back the raw answer text.
//!
//! # Example
//!
//! ```rust,ignore
//! use perplexity_client::{clean_payload, PerplexityClient, StructuredOutput, StructuredRequest};
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct Answer {
//!     influencers: Vec<String>,
//! }
//!
//! let client = PerplexityClient::new(api_key);
//! let raw = client
//!     .structured_output(StructuredRequest::new("sonar", system, prompt, Answer::answer_schema()))
//!     .await?;
//! let answer: Answer = serde_json::from_str(&clean_payload(&raw))?;
//! ```

pub mod error;
pub mod schema;
pub mod types;

pub use error::{PerplexityError, Result};
pub use schema::StructuredOutput;
pub use types::*;

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";

/// Pure Perplexity API client.
#[derive(Clone)]
pub struct PerplexityClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl PerplexityClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Set a custom base URL (for proxies, test servers, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Bound every request by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PerplexityError::Config(e.to_string()))?;
        Ok(self)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Structured output with JSON schema.
    ///
    /// Returns the raw textual payload; callers clean and parse it.
    pub async fn structured_output(&self, request: StructuredRequest) -> Result<String> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Perplexity structured request failed");
                PerplexityError::from_transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %body, "Perplexity structured output error");
            return Err(PerplexityError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let raw: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(PerplexityError::from_transport)?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "Perplexity structured output"
        );

        first_content(raw.choices)
    }
}

fn first_content(choices: Vec<types::ChatChoice>) -> Result<String> {
    choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| PerplexityError::MalformedResponse("No content in Perplexity response".into()))
}
