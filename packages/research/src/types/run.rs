//! Research run job records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ClaimId, InfluencerId, ResearchRunId};
use crate::error::ResearchError;

/// Which analysis mode a run belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunKind {
    Bulk,
    Single,
    Claim,
}

impl RunKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bulk => "bulk",
            Self::Single => "single",
            Self::Claim => "claim",
        }
    }
}

impl std::fmt::Display for RunKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RunKind {
    type Err = ResearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "bulk" => Ok(Self::Bulk),
            "single" => Ok(Self::Single),
            "claim" => Ok(Self::Claim),
            _ => Err(ResearchError::InvalidInput("Invalid research type".into())),
        }
    }
}

/// A job record grouping one discovery or validation pass.
///
/// Bulk runs link many influencers, single runs one influencer, claim runs
/// one claim. After creation only `failed`, the links and `updated_at` change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchRun {
    pub id: ResearchRunId,
    pub kind: RunKind,
    pub failed: bool,
    pub influencer_ids: Vec<InfluencerId>,
    pub influencer_id: Option<InfluencerId>,
    pub claim_id: Option<ClaimId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle of a run while it executes. Not persisted; logged on transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Created,
    DiscoveringInfluencers,
    FetchingInfluencer,
    DiscoveringClaims,
    ValidatingClaim,
    Persisting,
    Completed,
    Failed,
}

impl RunPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}
