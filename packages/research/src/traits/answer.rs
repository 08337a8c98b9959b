//! Answer service trait for search-backed LLM questions.
//!
//! The pipeline only needs one capability from the answer service: send an
//! instruction plus a JSON schema and receive the JSON text of the answer.
//! Typed parsing happens in [`crate::pipeline::answer`].

use async_trait::async_trait;

use crate::error::Result;
use crate::security::ApiKey;

/// One outbound question.
#[derive(Debug, Clone)]
pub struct AnswerRequest {
    /// Model identifier
    pub model: String,

    /// System message
    pub system: String,

    /// Natural-language instruction
    pub prompt: String,

    /// JSON schema the answer must follow
    pub schema: serde_json::Value,

    /// Name of the expected answer type (for logging and mocks)
    pub schema_name: String,

    /// Overrides the service's configured key for this request
    pub api_key: Option<ApiKey>,
}

/// Answer service abstraction.
///
/// Implementations send exactly one request per call: no batching, retry,
/// caching or rate limiting. The returned text has markdown fences and
/// layout whitespace already stripped.
#[async_trait]
pub trait AnswerService: Send + Sync {
    async fn ask(&self, request: &AnswerRequest) -> Result<String>;
}

#[async_trait]
impl<T: AnswerService + ?Sized> AnswerService for std::sync::Arc<T> {
    async fn ask(&self, request: &AnswerRequest) -> Result<String> {
        (**self).ask(request).await
    }
}
