//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the research library
//! without making real answer-service calls.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::error::{ResearchError, Result};
use crate::traits::answer::{AnswerRequest, AnswerService};

#[derive(Debug, Clone)]
enum MockReply {
    Answer(String),
    Fail(String),
}

/// A mock answer service for testing.
///
/// Canned replies are matched by substring against the prompt. Rules are
/// checked in registration order and the first match wins, so register
/// specific needles before general ones.
#[derive(Default, Clone)]
pub struct MockAnswerService {
    /// Replies keyed by prompt substring
    rules: Arc<RwLock<Vec<(String, MockReply)>>>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockAnswerCall>>>,
}

/// Record of a call made to the mock answer service.
#[derive(Debug, Clone)]
pub struct MockAnswerCall {
    pub model: String,
    pub schema_name: String,
    pub prompt: String,
    pub has_api_key: bool,
}

impl MockAnswerService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `body` when the prompt contains `needle`.
    pub fn respond_when(self, needle: impl Into<String>, body: impl Into<String>) -> Self {
        self.rules
            .write()
            .unwrap()
            .push((needle.into(), MockReply::Answer(body.into())));
        self
    }

    /// Reply with serialized `value` when the prompt contains `needle`.
    pub fn respond_json(self, needle: impl Into<String>, value: serde_json::Value) -> Self {
        self.respond_when(needle, value.to_string())
    }

    /// Fail with an upstream error when the prompt contains `needle`.
    pub fn fail_when(self, needle: impl Into<String>, message: impl Into<String>) -> Self {
        self.rules
            .write()
            .unwrap()
            .push((needle.into(), MockReply::Fail(message.into())));
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockAnswerCall> {
        self.calls.read().unwrap().clone()
    }

    /// Calls whose expected answer type is `schema_name`.
    pub fn calls_for(&self, schema_name: &str) -> Vec<MockAnswerCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.schema_name == schema_name)
            .collect()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }
}

#[async_trait]
impl AnswerService for MockAnswerService {
    async fn ask(&self, request: &AnswerRequest) -> Result<String> {
        self.calls.write().unwrap().push(MockAnswerCall {
            model: request.model.clone(),
            schema_name: request.schema_name.clone(),
            prompt: request.prompt.clone(),
            has_api_key: request.api_key.is_some(),
        });

        let reply = self
            .rules
            .read()
            .unwrap()
            .iter()
            .find(|(needle, _)| request.prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(MockReply::Answer(body)) => Ok(body),
            Some(MockReply::Fail(message)) => Err(ResearchError::Upstream(message)),
            None => Err(ResearchError::Upstream(format!(
                "No canned answer for {} prompt",
                request.schema_name
            ))),
        }
    }
}

/// Answer body listing papers as `(link, is_evidence)` pairs.
pub fn papers_answer(papers: &[(&str, bool)]) -> serde_json::Value {
    serde_json::json!({
        "research_papers": papers
            .iter()
            .map(|(link, is_evidence)| serde_json::json!({
                "title": format!("Study at {}", link),
                "link": link,
                "journal": "Nature",
                "date": "2023-06-01",
                "is_evidence": is_evidence,
            }))
            .collect::<Vec<_>>()
    })
}

/// Answer body listing claims by text.
pub fn claims_answer(claims: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "health_claims": claims
            .iter()
            .map(|claim| serde_json::json!({
                "claim": claim,
                "category": "Nutrition",
                "date": "2024-02-15",
            }))
            .collect::<Vec<_>>()
    })
}

/// Answer body listing influencers by name.
pub fn influencers_answer(names: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "influencers": names
            .iter()
            .map(|name| serde_json::json!({
                "name": name,
                "bio": format!("{} talks about health", name),
                "category": "Wellness",
                "followers": 1_000_000,
            }))
            .collect::<Vec<_>>()
    })
}

/// Answer body describing one influencer.
pub fn influencer_answer(name: &str) -> serde_json::Value {
    serde_json::json!({
        "influencer": {
            "name": name,
            "bio": format!("{} talks about health", name),
            "category": "Wellness",
            "followers": 2_500_000,
        }
    })
}
