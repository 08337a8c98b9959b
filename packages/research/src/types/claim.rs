//! Health claims and their scored form.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ClaimId, InfluencerId};
use super::paper::{ClaimPapers, ResearchPaper};
use super::scoring::ClaimStatus;

/// A persisted claim owned by exactly one influencer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub influencer_id: InfluencerId,
    pub claim: String,
    pub source: Option<String>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub trust_score: f64,
    pub status: ClaimStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a claim.
///
/// There is no status field: stores derive it from `trust_score` on insert
/// so the two can never disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClaim {
    pub influencer_id: InfluencerId,
    pub claim: String,
    pub source: Option<String>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub trust_score: f64,
}

impl NewClaim {
    pub fn status(&self) -> ClaimStatus {
        ClaimStatus::from_score(self.trust_score)
    }
}

/// A claim with its evidence and counter-evidence papers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimWithPapers {
    #[serde(flatten)]
    pub claim: Claim,
    pub evidence: Vec<ResearchPaper>,
    pub counter_evidence: Vec<ResearchPaper>,
}

impl ClaimWithPapers {
    pub fn new(claim: Claim, papers: ClaimPapers) -> Self {
        Self {
            claim,
            evidence: papers.evidence,
            counter_evidence: papers.counter_evidence,
        }
    }
}
