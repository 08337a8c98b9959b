//! Health claim discovery for one influencer.
//!
//! One call lists candidate claims, then each candidate is validated with
//! its own call. Validations run concurrently through a bounded, ordered
//! stream so results keep the order the answer service gave them.

use chrono::NaiveDate;
use futures::future;
use futures::stream::{self, StreamExt};
use tracing::{info, instrument, warn};

use super::answer::{ask, CandidateClaim, HealthClaimsAnswer};
use super::prompts::{discover_claims_prompt, RESEARCH_SYSTEM};
use super::validate::{validate_claim, ValidationResult};
use crate::error::Result;
use crate::traits::answer::AnswerService;
use crate::types::{config::AnswerSettings, dates::normalize_date};

/// What to ask for when discovering claims.
#[derive(Debug, Clone)]
pub struct ClaimQuery<'a> {
    pub influencer: &'a str,
    pub count: usize,
    pub journals: &'a [String],
    pub note: Option<&'a str>,
    pub timeframe: &'a str,
}

/// A discovered claim merged with its validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedClaim {
    pub claim: String,
    pub category: Option<String>,
    pub source: Option<String>,
    pub date: Option<NaiveDate>,
    pub validation: ValidationResult,
}

impl ValidatedClaim {
    pub fn from_candidate(candidate: CandidateClaim, validation: ValidationResult) -> Self {
        Self {
            claim: candidate.claim.trim().to_string(),
            category: candidate.category.filter(|c| !c.trim().is_empty()),
            source: candidate.source.filter(|s| !s.trim().is_empty()),
            date: normalize_date(candidate.date.as_deref()),
            validation,
        }
    }
}

/// Discover and validate claims for one influencer.
///
/// Fails only when the claim listing itself fails. A claim whose validation
/// fails is dropped with a warning.
#[instrument(skip(service, settings, query), fields(influencer = %query.influencer, count = query.count))]
pub async fn discover_claims<A>(
    service: &A,
    settings: &AnswerSettings,
    query: &ClaimQuery<'_>,
    concurrency: usize,
) -> Result<Vec<ValidatedClaim>>
where
    A: AnswerService + ?Sized,
{
    let answer: HealthClaimsAnswer = ask(
        service,
        settings,
        RESEARCH_SYSTEM,
        discover_claims_prompt(
            query.influencer,
            query.count,
            query.journals,
            query.note,
            query.timeframe,
        ),
    )
    .await?;

    let candidates: Vec<CandidateClaim> = answer
        .health_claims
        .into_iter()
        .filter(|c| !c.claim.trim().is_empty())
        .collect();
    let candidate_count = candidates.len();
    let journals = query.journals;

    let validated: Vec<ValidatedClaim> = stream::iter(candidates.into_iter().map(move |candidate| async move {
        let outcome = validate_claim(service, settings, candidate.claim.trim(), journals).await;
        match outcome {
            Ok(validation) => Some(ValidatedClaim::from_candidate(candidate, validation)),
            Err(e) => {
                warn!(claim = %candidate.claim, error = %e, "Claim validation failed, skipping");
                None
            }
        }
    }))
    .buffered(concurrency.max(1))
    .filter_map(future::ready)
    .collect()
    .await;

    info!(
        candidates = candidate_count,
        claim_count = validated.len(),
        "Claims discovered"
    );

    Ok(validated)
}
