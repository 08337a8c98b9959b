//! Research runs: the three analysis modes end to end.
//!
//! A run is created first ([`ResearchService::begin_run`]) and executed
//! later, so callers get an id before any slow discovery work starts.
//! Terminal failure flags the run but never rolls back claims that were
//! already persisted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, error, info, instrument, warn};

use super::claims::{discover_claims, ClaimQuery, ValidatedClaim};
use super::dedup::{aggregate_trust_score, is_duplicate};
use super::influencers::{discover_influencers, lookup_influencer};
use super::validate::{validate_claim, ValidationResult};
use crate::error::{ResearchError, Result};
use crate::traits::{answer::AnswerService, store::ResearchStore};
use crate::types::{
    claim::{Claim, ClaimWithPapers, NewClaim},
    config::{
        default_journals, AnswerSettings, ResearchSettings, DEFAULT_COUNT, DEFAULT_TIMEFRAME,
    },
    ids::{InfluencerId, ResearchRunId},
    influencer::{Influencer, NewInfluencer},
    run::{ResearchRun, RunKind, RunPhase},
};

/// Parse a caller-supplied run id.
pub fn parse_run_id(raw: Option<&str>) -> Result<ResearchRunId> {
    let raw = raw
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ResearchError::InvalidInput("Research ID is required".into()))?;
    ResearchRunId::parse(raw)
        .map_err(|_| ResearchError::InvalidInput("Research ID is invalid".into()))
}

// =============================================================================
// Requests and outcomes
// =============================================================================

/// Discover influencers and their claims.
#[derive(Debug, Clone, Default)]
pub struct BulkRequest {
    pub run_id: Option<ResearchRunId>,
    pub answer: AnswerSettings,
    pub journals: Option<Vec<String>>,
    pub note: Option<String>,
    /// Influencers to discover (default 5)
    pub count: Option<usize>,
    /// Claims per influencer (default 5)
    pub claim_count: Option<usize>,
    pub exclude: Vec<String>,
    pub timeframe: Option<String>,
}

/// Check one named influencer.
#[derive(Debug, Clone, Default)]
pub struct SingleInfluencerRequest {
    pub run_id: Option<ResearchRunId>,
    pub answer: AnswerSettings,
    pub influencer: String,
    pub count: Option<usize>,
    pub timeframe: Option<String>,
    pub journals: Option<Vec<String>>,
    pub note: Option<String>,
}

/// Validate one claim outside any influencer.
#[derive(Debug, Clone, Default)]
pub struct SingleClaimRequest {
    /// Begins a fresh claim run when absent
    pub run_id: Option<ResearchRunId>,
    pub answer: AnswerSettings,
    pub claim: String,
    pub journals: Option<Vec<String>>,
}

/// One influencer's persisted results.
#[derive(Debug, Clone, Serialize)]
pub struct InfluencerOutcome {
    pub run_id: ResearchRunId,
    pub influencer: Influencer,
    /// Whether the influencer record was created by this run
    pub created: bool,
    /// Claims accepted in this run
    pub claims: Vec<Claim>,
    /// Candidates discarded as duplicates of existing claims
    pub duplicates: usize,
}

/// A recovered per-influencer failure inside a bulk run.
#[derive(Debug, Clone, Serialize)]
pub struct InfluencerFailure {
    pub influencer: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkOutcome {
    pub run_id: ResearchRunId,
    pub influencers: Vec<InfluencerOutcome>,
    pub failures: Vec<InfluencerFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClaimOutcome {
    pub run_id: ResearchRunId,
    pub influencer: Influencer,
    #[serde(flatten)]
    pub claim: ClaimWithPapers,
}

// =============================================================================
// Per-influencer locking
// =============================================================================

/// Serializes persist-and-recompute per influencer.
///
/// Claim inserts and the aggregate score update for one influencer must not
/// interleave with another run's, or one score update is lost. Entries that
/// no guard or waiter holds are pruned on the next `lock` call, so the map
/// only tracks influencers with work in flight.
#[derive(Clone, Default)]
pub struct InfluencerLocks {
    locks: Arc<StdMutex<HashMap<InfluencerId, Arc<Mutex<()>>>>>,
}

impl InfluencerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, id: InfluencerId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of influencers currently tracked.
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Service
// =============================================================================

/// Runs research against a store and an answer service.
///
/// Both may be trait objects, so a server can pick backends at runtime.
pub struct ResearchService<S: ?Sized, A: ?Sized> {
    store: Arc<S>,
    answers: Arc<A>,
    settings: ResearchSettings,
    locks: InfluencerLocks,
}

impl<S: ?Sized, A: ?Sized> Clone for ResearchService<S, A> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            answers: self.answers.clone(),
            settings: self.settings.clone(),
            locks: self.locks.clone(),
        }
    }
}

impl<S, A> ResearchService<S, A>
where
    S: ResearchStore + ?Sized,
    A: AnswerService + ?Sized,
{
    pub fn new(store: Arc<S>, answers: Arc<A>) -> Self {
        Self::with_settings(store, answers, ResearchSettings::default())
    }

    pub fn with_settings(store: Arc<S>, answers: Arc<A>, settings: ResearchSettings) -> Self {
        Self {
            store,
            answers,
            settings,
            locks: InfluencerLocks::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &ResearchSettings {
        &self.settings
    }

    // =========================================================================
    // Runs
    // =========================================================================

    /// Create a run in the `created` state.
    pub async fn begin_run(&self, kind: RunKind) -> Result<ResearchRun> {
        let run = self.store.create_run(kind).await?;
        log_phase(run.id, RunPhase::Created);
        info!(run_id = %run.id, kind = %kind, "Research run created");
        Ok(run)
    }

    /// Discover influencers, then claims for each.
    ///
    /// A failed influencer listing fails the run. A failed claim listing for
    /// one influencer is recorded in `failures` and the rest of the batch
    /// continues.
    #[instrument(skip(self, request), fields(run_id = tracing::field::Empty))]
    pub async fn run_bulk(&self, request: BulkRequest) -> Result<BulkOutcome> {
        let run = self.load_run(request.run_id, RunKind::Bulk).await?;
        tracing::Span::current().record("run_id", tracing::field::display(run.id));

        let count = request.count.unwrap_or(DEFAULT_COUNT);
        let journals = request.journals.clone().unwrap_or_else(default_journals);
        let timeframe = request
            .timeframe
            .clone()
            .unwrap_or_else(|| DEFAULT_TIMEFRAME.to_string());

        log_phase(run.id, RunPhase::DiscoveringInfluencers);
        let descriptors =
            match discover_influencers(&*self.answers, &request.answer, count, &request.exclude)
                .await
            {
                Ok(descriptors) => descriptors,
                Err(e) => return Err(self.fail_run(run.id, e).await),
            };

        let mut influencers = Vec::new();
        let mut failures = Vec::new();

        for descriptor in descriptors {
            log_phase(run.id, RunPhase::DiscoveringClaims);
            let query = ClaimQuery {
                influencer: &descriptor.name,
                count: request.claim_count.unwrap_or(DEFAULT_COUNT),
                journals: &journals,
                note: request.note.as_deref(),
                timeframe: &timeframe,
            };

            let claims = match discover_claims(
                &*self.answers,
                &request.answer,
                &query,
                self.settings.validation_concurrency,
            )
            .await
            {
                Ok(claims) => claims,
                Err(e) => {
                    warn!(run_id = %run.id, influencer = %descriptor.name, error = %e, "Claim discovery failed for influencer");
                    failures.push(InfluencerFailure {
                        influencer: descriptor.name.clone(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            log_phase(run.id, RunPhase::Persisting);
            let new = descriptor.to_new_influencer(&descriptor.name);
            let persisted = match self.persist_influencer(run.id, &new, claims).await {
                Ok(outcome) => outcome,
                Err(e) => return Err(self.fail_run(run.id, e).await),
            };
            if let Err(e) = self
                .store
                .add_run_influencer(run.id, persisted.influencer.id)
                .await
            {
                return Err(self.fail_run(run.id, e).await);
            }
            influencers.push(persisted);
        }

        self.store.touch_run(run.id).await?;
        log_phase(run.id, RunPhase::Completed);
        info!(
            run_id = %run.id,
            influencers = influencers.len(),
            failures = failures.len(),
            "Bulk research completed"
        );

        Ok(BulkOutcome {
            run_id: run.id,
            influencers,
            failures,
        })
    }

    /// Look up one influencer by name and discover their claims.
    ///
    /// The requested name is the identity key; the looked-up profile only
    /// fills descriptive fields of a newly created record.
    #[instrument(skip(self, request), fields(run_id = tracing::field::Empty, influencer = %request.influencer))]
    pub async fn run_single_influencer(
        &self,
        request: SingleInfluencerRequest,
    ) -> Result<InfluencerOutcome> {
        let name = request.influencer.trim().to_string();
        if name.is_empty() {
            return Err(ResearchError::InvalidInput(
                "Influencer name is required".into(),
            ));
        }

        let run = self.load_run(request.run_id, RunKind::Single).await?;
        tracing::Span::current().record("run_id", tracing::field::display(run.id));
        if run.influencer_id.is_some() {
            return Err(ResearchError::InvalidInput(format!(
                "Research run {} already has an influencer",
                run.id
            )));
        }

        match self.single_influencer(&run, &name, &request).await {
            Ok(outcome) => {
                log_phase(run.id, RunPhase::Completed);
                Ok(outcome)
            }
            Err(e) => Err(self.fail_run(run.id, e).await),
        }
    }

    async fn single_influencer(
        &self,
        run: &ResearchRun,
        name: &str,
        request: &SingleInfluencerRequest,
    ) -> Result<InfluencerOutcome> {
        log_phase(run.id, RunPhase::FetchingInfluencer);
        let descriptor = lookup_influencer(&*self.answers, &request.answer, name).await?;

        log_phase(run.id, RunPhase::DiscoveringClaims);
        let journals = request.journals.clone().unwrap_or_else(default_journals);
        let query = ClaimQuery {
            influencer: name,
            count: request.count.unwrap_or(DEFAULT_COUNT),
            journals: &journals,
            note: request.note.as_deref(),
            timeframe: request.timeframe.as_deref().unwrap_or(DEFAULT_TIMEFRAME),
        };
        let claims = discover_claims(
            &*self.answers,
            &request.answer,
            &query,
            self.settings.validation_concurrency,
        )
        .await?;

        log_phase(run.id, RunPhase::Persisting);
        let outcome = self
            .persist_influencer(run.id, &descriptor.to_new_influencer(name), claims)
            .await?;
        self.store
            .set_run_influencer(run.id, outcome.influencer.id)
            .await?;

        Ok(outcome)
    }

    /// Validate one claim and attach it to the sentinel influencer.
    ///
    /// Claims are never deduplicated here: validating the same text twice
    /// stores two independent claims.
    #[instrument(skip(self, request), fields(run_id = tracing::field::Empty))]
    pub async fn run_single_claim(&self, request: SingleClaimRequest) -> Result<ClaimOutcome> {
        let text = request.claim.trim().to_string();
        if text.is_empty() {
            return Err(ResearchError::InvalidInput("Claim is required".into()));
        }

        let run = match request.run_id {
            Some(id) => self.load_run(Some(id), RunKind::Claim).await?,
            None => self.begin_run(RunKind::Claim).await?,
        };
        tracing::Span::current().record("run_id", tracing::field::display(run.id));
        if run.claim_id.is_some() {
            return Err(ResearchError::InvalidInput(format!(
                "Research run {} already has a claim",
                run.id
            )));
        }

        match self.single_claim(&run, &text, &request).await {
            Ok(outcome) => {
                log_phase(run.id, RunPhase::Completed);
                Ok(outcome)
            }
            Err(e) => Err(self.fail_run(run.id, e).await),
        }
    }

    async fn single_claim(
        &self,
        run: &ResearchRun,
        text: &str,
        request: &SingleClaimRequest,
    ) -> Result<ClaimOutcome> {
        log_phase(run.id, RunPhase::ValidatingClaim);
        let journals = request.journals.clone().unwrap_or_else(default_journals);
        let validation = validate_claim(&*self.answers, &request.answer, text, &journals).await?;

        log_phase(run.id, RunPhase::Persisting);
        let (owner, _) = self
            .store
            .get_or_create_influencer(&NewInfluencer::sentinel())
            .await?;

        let _guard = self.locks.lock(owner.id).await;
        let validated = ValidatedClaim {
            claim: text.to_string(),
            category: None,
            source: None,
            date: None,
            validation,
        };
        let claim = self.persist_claim(owner.id, validated).await?;
        self.store.set_run_claim(run.id, claim.id).await?;
        let owner = self.recompute_trust_score(owner.id).await?;

        let papers = self.store.papers_for_claim(claim.id).await?;
        info!(
            run_id = %run.id,
            claim_id = %claim.id,
            trust_score = claim.trust_score,
            status = %claim.status,
            "Claim research completed"
        );

        Ok(ClaimOutcome {
            run_id: run.id,
            influencer: owner,
            claim: ClaimWithPapers::new(claim, papers),
        })
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn list_influencers(&self) -> Result<Vec<Influencer>> {
        self.store.list_influencers().await
    }

    pub async fn influencer(&self, id: InfluencerId) -> Result<Influencer> {
        self.store
            .find_influencer(id)
            .await?
            .ok_or_else(|| ResearchError::not_found("influencer", id))
    }

    /// An influencer's claims with their papers, in creation order.
    pub async fn influencer_claims(&self, id: InfluencerId) -> Result<Vec<ClaimWithPapers>> {
        self.influencer(id).await?;
        let claims = self.store.claims_for_influencer(id).await?;

        let mut detailed = Vec::with_capacity(claims.len());
        for claim in claims {
            let papers = self.store.papers_for_claim(claim.id).await?;
            detailed.push(ClaimWithPapers::new(claim, papers));
        }
        Ok(detailed)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    async fn load_run(&self, id: Option<ResearchRunId>, kind: RunKind) -> Result<ResearchRun> {
        let id = id.ok_or_else(|| ResearchError::InvalidInput("Research ID is required".into()))?;
        let run = self
            .store
            .find_run(id)
            .await?
            .ok_or_else(|| ResearchError::not_found("research run", id))?;

        if run.kind != kind {
            return Err(ResearchError::InvalidInput(format!(
                "Research run {} is a {} run, not {}",
                id, run.kind, kind
            )));
        }
        Ok(run)
    }

    /// Flag the run failed and hand back the error that caused it.
    async fn fail_run(&self, run_id: ResearchRunId, cause: ResearchError) -> ResearchError {
        log_phase(run_id, RunPhase::Failed);
        error!(run_id = %run_id, error = %cause, "Research run failed");
        if let Err(e) = self.store.mark_run_failed(run_id).await {
            error!(run_id = %run_id, error = %e, "Could not flag research run as failed");
        }
        cause
    }

    /// Get or create the influencer, drop duplicate claims, persist the
    /// rest and refresh the aggregate score.
    async fn persist_influencer(
        &self,
        run_id: ResearchRunId,
        new: &NewInfluencer,
        claims: Vec<ValidatedClaim>,
    ) -> Result<InfluencerOutcome> {
        let (influencer, created) = self.store.get_or_create_influencer(new).await?;
        let _guard = self.locks.lock(influencer.id).await;

        let mut known: Vec<String> = self
            .store
            .claims_for_influencer(influencer.id)
            .await?
            .into_iter()
            .map(|c| c.claim)
            .collect();

        let mut accepted = Vec::new();
        let mut duplicates = 0;

        for validated in claims {
            if is_duplicate(
                &validated.claim,
                known.iter().map(String::as_str),
                self.settings.duplicate_threshold,
            ) {
                debug!(influencer = %influencer.name, claim = %validated.claim, "Discarding duplicate claim");
                duplicates += 1;
                continue;
            }

            let claim = self.persist_claim(influencer.id, validated).await?;
            known.push(claim.claim.clone());
            accepted.push(claim);
        }

        let influencer = self.recompute_trust_score(influencer.id).await?;

        info!(
            run_id = %run_id,
            influencer = %influencer.name,
            created,
            claim_count = accepted.len(),
            duplicates,
            trust_score = ?influencer.trust_score,
            "Influencer research persisted"
        );

        Ok(InfluencerOutcome {
            run_id,
            influencer,
            created,
            claims: accepted,
            duplicates,
        })
    }

    async fn persist_claim(
        &self,
        influencer_id: InfluencerId,
        validated: ValidatedClaim,
    ) -> Result<Claim> {
        let ValidatedClaim {
            claim,
            category,
            source,
            date,
            validation: ValidationResult {
                trust_score,
                papers,
                ..
            },
        } = validated;

        let claim = self
            .store
            .create_claim(&NewClaim {
                influencer_id,
                claim,
                source,
                category,
                date,
                trust_score,
            })
            .await?;

        for cited in papers {
            let paper = self.store.create_research_paper(&cited.paper).await?;
            self.store
                .attach_paper(claim.id, paper.id, cited.role)
                .await?;
        }

        Ok(claim)
    }

    /// Mean of all the influencer's claim scores. Left unset with no claims.
    async fn recompute_trust_score(&self, influencer_id: InfluencerId) -> Result<Influencer> {
        let scores: Vec<f64> = self
            .store
            .claims_for_influencer(influencer_id)
            .await?
            .iter()
            .map(|c| c.trust_score)
            .collect();

        if let Some(score) = aggregate_trust_score(&scores) {
            self.store
                .set_influencer_trust_score(influencer_id, Some(score))
                .await?;
        }

        self.influencer(influencer_id).await
    }
}

fn log_phase(run_id: ResearchRunId, phase: RunPhase) {
    debug!(run_id = %run_id, phase = ?phase, terminal = phase.is_terminal(), "Research run phase");
}
