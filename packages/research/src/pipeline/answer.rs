//! Typed answers from the answer service.
//!
//! Every call site declares the exact shape it expects. The schema is sent
//! with the question and the reply is deserialized strictly: invalid JSON or
//! a missing top-level key becomes [`ResearchError::UpstreamMalformed`].

use perplexity_client::{clean_payload, StructuredOutput};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ResearchError, Result};
use crate::traits::answer::{AnswerRequest, AnswerService};
use crate::types::config::AnswerSettings;
use crate::types::influencer::InfluencerDescriptor;

/// Ask one question and parse the answer as `T`.
pub async fn ask<T, A>(
    service: &A,
    settings: &AnswerSettings,
    system: &str,
    prompt: String,
) -> Result<T>
where
    T: StructuredOutput,
    A: AnswerService + ?Sized,
{
    let request = AnswerRequest {
        model: settings.model.clone(),
        system: system.to_string(),
        prompt,
        schema: T::answer_schema(),
        schema_name: T::type_name(),
        api_key: settings.api_key.clone(),
    };

    let raw = service.ask(&request).await?;
    parse_answer(&request.schema_name, &raw)
}

/// Parse answer text into `T`, stripping any fences left in it.
pub fn parse_answer<T: StructuredOutput>(schema_name: &str, raw: &str) -> Result<T> {
    let cleaned = clean_payload(raw);
    match serde_json::from_str(&cleaned) {
        Ok(value) => {
            debug!(schema = schema_name, "Parsed answer");
            Ok(value)
        }
        Err(e) => {
            warn!(schema = schema_name, error = %e, "Answer did not match schema");
            Err(ResearchError::UpstreamMalformed(format!(
                "{} answer: {}",
                schema_name, e
            )))
        }
    }
}

// =============================================================================
// Answer shapes
// =============================================================================

/// A research paper as cited by the answer service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CandidatePaper {
    /// Paper title
    #[serde(default)]
    pub title: String,

    /// Link to the paper
    #[serde(default)]
    pub link: Option<String>,

    /// Journal name
    #[serde(default)]
    pub journal: Option<String>,

    /// Publication date (yyyy-mm-dd)
    #[serde(default)]
    pub date: Option<String>,

    /// Whether the paper supports the claim
    pub is_evidence: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResearchPapersAnswer {
    pub research_papers: Vec<CandidatePaper>,
}

/// A health claim as reported by the answer service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CandidateClaim {
    /// The claim text
    pub claim: String,

    /// Health category (Nutrition, Medicine, ...)
    #[serde(default)]
    pub category: Option<String>,

    /// Where the influencer made the claim
    #[serde(default)]
    pub source: Option<String>,

    /// When the claim was made (yyyy-mm-dd)
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HealthClaimsAnswer {
    pub health_claims: Vec<CandidateClaim>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InfluencersAnswer {
    pub influencers: Vec<InfluencerDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InfluencerAnswer {
    pub influencer: InfluencerDescriptor,
}
