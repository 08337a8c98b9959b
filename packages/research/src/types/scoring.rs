//! Trust score arithmetic and the status label derived from it.

use serde::{Deserialize, Serialize};

/// Score given to a claim when no paper supports or contradicts it.
///
/// Absence of evidence is treated as neutral, not as falsity.
pub const NEUTRAL_TRUST_SCORE: f64 = 0.5;

/// Scores strictly above this are `verified`.
pub const VERIFIED_THRESHOLD: f64 = 0.75;

/// Scores strictly below this are `debunked`.
pub const DEBUNKED_THRESHOLD: f64 = 0.25;

/// Round to two decimal places (half away from zero).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Evidence ratio for a claim.
pub fn trust_score(evidence_count: usize, counter_evidence_count: usize) -> f64 {
    let total = evidence_count + counter_evidence_count;
    if total == 0 {
        return NEUTRAL_TRUST_SCORE;
    }
    round2(evidence_count as f64 / total as f64)
}

/// Mean of claim scores, rounded. `None` for an empty set.
pub fn mean_trust_score(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let sum: f64 = scores.iter().sum();
    Some(round2(sum / scores.len() as f64))
}

/// Credibility label of a claim. Always derived from its trust score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    Verified,
    Questionable,
    Debunked,
}

impl ClaimStatus {
    /// Thresholds are strict: 0.75 and 0.25 are both `questionable`.
    pub fn from_score(score: f64) -> Self {
        if score > VERIFIED_THRESHOLD {
            Self::Verified
        } else if score < DEBUNKED_THRESHOLD {
            Self::Debunked
        } else {
            Self::Questionable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Questionable => "questionable",
            Self::Debunked => "debunked",
        }
    }
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClaimStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verified" => Ok(Self::Verified),
            "questionable" => Ok(Self::Questionable),
            "debunked" => Ok(Self::Debunked),
            other => Err(format!("unknown claim status: {}", other)),
        }
    }
}
