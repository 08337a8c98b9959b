//! Configuration types and request defaults.

use serde::{Deserialize, Serialize};

use crate::security::ApiKey;

/// Default answer-service model.
pub use perplexity_client::DEFAULT_MODEL;

/// Default number of influencers or claims requested.
pub const DEFAULT_COUNT: usize = 5;

/// Default claim timeframe phrase.
pub const DEFAULT_TIMEFRAME: &str = "latest";

/// Journals research papers should come from unless the caller overrides.
pub const DEFAULT_JOURNALS: [&str; 8] = [
    "any",
    "Pubmed Central",
    "Nature",
    "Science",
    "Cell",
    "The Lancet",
    "New England Journal of Medicine",
    "JAMA",
];

pub fn default_journals() -> Vec<String> {
    DEFAULT_JOURNALS.iter().map(|j| j.to_string()).collect()
}

/// Per-request answer-service settings.
///
/// `api_key` overrides the key the answer service was configured with.
#[derive(Debug, Clone)]
pub struct AnswerSettings {
    pub api_key: Option<ApiKey>,
    pub model: String,
}

impl Default for AnswerSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl AnswerSettings {
    /// Build from optional caller input, applying defaults for blanks.
    pub fn from_parts(api_key: Option<String>, model: Option<String>) -> Self {
        Self {
            api_key: ApiKey::non_empty(api_key),
            model: model
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<ApiKey>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

/// Settings for the research service itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchSettings {
    /// Claims validated concurrently for one influencer.
    ///
    /// Default: 4.
    pub validation_concurrency: usize,

    /// Similarity above which a new claim duplicates an existing one.
    ///
    /// Default: 0.6.
    pub duplicate_threshold: f64,
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self {
            validation_concurrency: 4,
            duplicate_threshold: 0.6,
        }
    }
}

impl ResearchSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set validation concurrency (at least 1).
    pub fn with_validation_concurrency(mut self, concurrency: usize) -> Self {
        self.validation_concurrency = concurrency.max(1);
        self
    }

    pub fn with_duplicate_threshold(mut self, threshold: f64) -> Self {
        self.duplicate_threshold = threshold;
        self
    }
}
