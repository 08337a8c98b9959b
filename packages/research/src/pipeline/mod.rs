//! Research pipeline - the core of the library.
//!
//! The pipeline orchestrates:
//! - Influencer discovery and lookup
//! - Claim discovery with concurrent per-claim validation
//! - Evidence weighing into trust scores
//! - Claim deduplication and influencer score aggregation
//! - Research runs in bulk, single-influencer and single-claim modes

pub mod answer;
pub mod claims;
pub mod dedup;
pub mod influencers;
pub mod orchestrator;
pub mod prompts;
pub mod validate;

pub use answer::{
    ask, parse_answer, CandidateClaim, CandidatePaper, HealthClaimsAnswer, InfluencerAnswer,
    InfluencersAnswer, ResearchPapersAnswer,
};
pub use claims::{discover_claims, ClaimQuery, ValidatedClaim};
pub use dedup::{aggregate_trust_score, find_duplicate, is_duplicate, similarity, DUPLICATE_THRESHOLD};
pub use influencers::{discover_influencers, lookup_influencer};
pub use orchestrator::{
    parse_run_id, BulkOutcome, BulkRequest, ClaimOutcome, InfluencerFailure, InfluencerLocks,
    InfluencerOutcome, ResearchService, SingleClaimRequest, SingleInfluencerRequest,
};
pub use validate::{validate_claim, weigh_papers, CitedPaper, ValidationResult};
