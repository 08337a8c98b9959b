//! Influencer records.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ids::InfluencerId;

/// Name of the placeholder owner for claims checked outside any influencer.
pub const DEFAULT_INFLUENCER_NAME: &str = "Default";

/// A tracked health influencer.
///
/// `trust_score` is the rounded mean of the influencer's claim scores and is
/// `None` while the influencer has no claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Influencer {
    pub id: InfluencerId,
    pub name: String,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    pub category: Option<String>,
    pub followers: Option<i64>,
    pub trust_score: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating an influencer. Trust score is never set on insert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewInfluencer {
    pub name: String,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    pub category: Option<String>,
    pub followers: Option<i64>,
}

impl NewInfluencer {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The placeholder owner for claim-mode research.
    pub fn sentinel() -> Self {
        Self {
            name: DEFAULT_INFLUENCER_NAME.to_string(),
            bio: Some("Owner of claims checked without an influencer".to_string()),
            ..Default::default()
        }
    }
}

/// An influencer as described by the answer service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InfluencerDescriptor {
    /// Display name
    pub name: String,

    /// Detailed biography
    #[serde(default)]
    pub bio: Option<String>,

    /// Health topic the influencer focuses on
    #[serde(default)]
    pub category: Option<String>,

    /// Follower count across platforms
    #[serde(default)]
    pub followers: Option<i64>,

    /// Link to a profile image
    #[serde(default)]
    pub profile_picture: Option<String>,
}

impl InfluencerDescriptor {
    /// Insert fields under the given identity name.
    pub fn to_new_influencer(&self, name: &str) -> NewInfluencer {
        NewInfluencer {
            name: name.to_string(),
            profile_picture: self.profile_picture.clone(),
            bio: self.bio.clone(),
            category: self.category.clone(),
            followers: self.followers,
        }
    }
}
