//! Health Claim Research Library
//!
//! Discovers health influencers, extracts the claims they make and scores
//! each claim by weighing research papers that support or contradict it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use research::{MemoryStore, ResearchService, RunKind, SingleClaimRequest};
//! use research::testing::MockAnswerService;
//!
//! let service = ResearchService::new(Arc::new(MemoryStore::new()), Arc::new(MockAnswerService::new()));
//!
//! let outcome = service
//!     .run_single_claim(SingleClaimRequest {
//!         claim: "Creatine improves memory".into(),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("{} -> {}", outcome.claim.claim.claim, outcome.claim.claim.status);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (AnswerService, ResearchStore)
//! - [`types`] - Domain records, ids, scoring and dates
//! - [`pipeline`] - Validation, discovery, dedup and research runs
//! - [`stores`] - Storage implementations (MemoryStore, PostgresStore)
//! - [`ai`] - Answer service implementations (Perplexity)
//! - [`security`] - API key handling
//! - [`testing`] - Mock implementations for testing

pub mod ai;
pub mod error;
pub mod pipeline;
pub mod security;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{ResearchError, Result};
pub use pipeline::{
    parse_run_id, BulkOutcome, BulkRequest, ClaimOutcome, InfluencerFailure, InfluencerOutcome,
    ResearchService, SingleClaimRequest, SingleInfluencerRequest, ValidationResult,
};
pub use security::ApiKey;
pub use stores::MemoryStore;
pub use traits::{
    answer::{AnswerRequest, AnswerService},
    store::ResearchStore,
};
pub use types::{
    claim::{Claim, ClaimWithPapers, NewClaim},
    config::{AnswerSettings, ResearchSettings, DEFAULT_COUNT, DEFAULT_MODEL, DEFAULT_TIMEFRAME},
    ids::{ClaimId, InfluencerId, ResearchPaperId, ResearchRunId},
    influencer::{Influencer, InfluencerDescriptor, NewInfluencer, DEFAULT_INFLUENCER_NAME},
    paper::{ClaimPapers, NewResearchPaper, PaperRole, ResearchPaper},
    run::{ResearchRun, RunKind, RunPhase},
    scoring::ClaimStatus,
};

#[cfg(feature = "postgres")]
pub use stores::PostgresStore;

#[cfg(feature = "perplexity")]
pub use ai::PerplexityAnswerService;
