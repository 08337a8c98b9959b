//! Storage trait for influencers, claims, papers and research runs.
//!
//! The core never issues queries beyond these shapes. Backends:
//! [`crate::stores::MemoryStore`] and, with the `postgres` feature,
//! [`crate::stores::PostgresStore`].

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    claim::{Claim, NewClaim},
    ids::{ClaimId, InfluencerId, ResearchPaperId, ResearchRunId},
    influencer::{Influencer, NewInfluencer},
    paper::{ClaimPapers, NewResearchPaper, PaperRole, ResearchPaper},
    run::{ResearchRun, RunKind},
};

#[async_trait]
pub trait ResearchStore: Send + Sync {
    // ---------------------------------------------------------------------
    // Research runs
    // ---------------------------------------------------------------------

    /// Create a run in the `created` state.
    async fn create_run(&self, kind: RunKind) -> Result<ResearchRun>;

    async fn find_run(&self, id: ResearchRunId) -> Result<Option<ResearchRun>>;

    /// Set the failure flag and touch `updated_at`.
    async fn mark_run_failed(&self, id: ResearchRunId) -> Result<()>;

    /// Touch `updated_at`.
    async fn touch_run(&self, id: ResearchRunId) -> Result<()>;

    /// Add an influencer to a bulk run's set. Adding twice is a no-op.
    async fn add_run_influencer(&self, run_id: ResearchRunId, influencer_id: InfluencerId)
        -> Result<()>;

    /// Set a single run's influencer reference.
    async fn set_run_influencer(&self, run_id: ResearchRunId, influencer_id: InfluencerId)
        -> Result<()>;

    /// Set a claim run's claim reference.
    async fn set_run_claim(&self, run_id: ResearchRunId, claim_id: ClaimId) -> Result<()>;

    // ---------------------------------------------------------------------
    // Influencers
    // ---------------------------------------------------------------------

    async fn find_influencer(&self, id: InfluencerId) -> Result<Option<Influencer>>;

    /// Exact name match. With duplicate names, the oldest record wins.
    async fn find_influencer_by_name(&self, name: &str) -> Result<Option<Influencer>>;

    /// Return the influencer with `new.name`, creating it if absent.
    ///
    /// The boolean is `true` when a record was created. Existing records are
    /// returned unchanged.
    async fn get_or_create_influencer(&self, new: &NewInfluencer) -> Result<(Influencer, bool)>;

    /// All influencers in creation order.
    async fn list_influencers(&self) -> Result<Vec<Influencer>>;

    async fn set_influencer_trust_score(&self, id: InfluencerId, score: Option<f64>)
        -> Result<()>;

    // ---------------------------------------------------------------------
    // Claims and papers
    // ---------------------------------------------------------------------

    /// Insert a claim; the stored status is derived from its trust score.
    async fn create_claim(&self, new: &NewClaim) -> Result<Claim>;

    async fn find_claim(&self, id: ClaimId) -> Result<Option<Claim>>;

    /// Claims of one influencer in creation order.
    async fn claims_for_influencer(&self, influencer_id: InfluencerId) -> Result<Vec<Claim>>;

    async fn create_research_paper(&self, new: &NewResearchPaper) -> Result<ResearchPaper>;

    /// Attach a paper to one of a claim's sets.
    ///
    /// A paper is in at most one set per claim: attaching it to one role
    /// removes it from the other.
    async fn attach_paper(
        &self,
        claim_id: ClaimId,
        paper_id: ResearchPaperId,
        role: PaperRole,
    ) -> Result<()>;

    /// Remove a paper from whichever set of the claim holds it.
    async fn detach_paper(&self, claim_id: ClaimId, paper_id: ResearchPaperId) -> Result<()>;

    async fn papers_for_claim(&self, claim_id: ClaimId) -> Result<ClaimPapers>;
}
