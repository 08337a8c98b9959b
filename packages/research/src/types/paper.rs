//! Research papers cited for or against a claim.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ResearchPaperId;

/// A paper record. Papers are claim-scoped: the same link cited by two
/// claims yields two records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchPaper {
    pub id: ResearchPaperId,
    pub title: String,
    pub link: String,
    pub journal: Option<String>,
    pub date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewResearchPaper {
    pub title: String,
    pub link: String,
    pub journal: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Which side of a claim a paper lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaperRole {
    Evidence,
    CounterEvidence,
}

impl PaperRole {
    pub fn from_is_evidence(is_evidence: bool) -> Self {
        if is_evidence {
            Self::Evidence
        } else {
            Self::CounterEvidence
        }
    }
}

/// Papers attached to one claim, split by role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimPapers {
    pub evidence: Vec<ResearchPaper>,
    pub counter_evidence: Vec<ResearchPaper>,
}
