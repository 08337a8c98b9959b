//! Claim validation: papers for and against a claim, weighed into a score.

use tracing::{debug, instrument};

use super::answer::{ask, CandidatePaper, ResearchPapersAnswer};
use super::prompts::{research_papers_prompt, RESEARCH_SYSTEM};
use crate::error::Result;
use crate::traits::answer::AnswerService;
use crate::types::{
    config::AnswerSettings,
    dates::normalize_date,
    paper::{NewResearchPaper, PaperRole},
    scoring::{trust_score, ClaimStatus},
};

/// A citable paper and the side it lands on.
#[derive(Debug, Clone, PartialEq)]
pub struct CitedPaper {
    pub paper: NewResearchPaper,
    pub role: PaperRole,
}

/// Outcome of validating one claim.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub trust_score: f64,
    pub status: ClaimStatus,
    /// Citable papers in answer order.
    pub papers: Vec<CitedPaper>,
}

impl ValidationResult {
    pub fn evidence_links(&self) -> Vec<&str> {
        self.links(PaperRole::Evidence)
    }

    pub fn counter_evidence_links(&self) -> Vec<&str> {
        self.links(PaperRole::CounterEvidence)
    }

    fn links(&self, role: PaperRole) -> Vec<&str> {
        self.papers
            .iter()
            .filter(|p| p.role == role)
            .map(|p| p.paper.link.as_str())
            .collect()
    }
}

/// Weigh candidate papers into a validation result.
///
/// Every candidate counts toward the score by its tag. Only candidates with
/// a link are kept as citable papers. No candidates gives the neutral score.
pub fn weigh_papers(candidates: Vec<CandidatePaper>) -> ValidationResult {
    let evidence = candidates.iter().filter(|c| c.is_evidence).count();
    let counter_evidence = candidates.len() - evidence;
    let score = trust_score(evidence, counter_evidence);

    let papers = candidates
        .into_iter()
        .filter_map(|candidate| {
            let link = candidate
                .link
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty())?
                .to_string();

            Some(CitedPaper {
                role: PaperRole::from_is_evidence(candidate.is_evidence),
                paper: NewResearchPaper {
                    title: candidate.title.trim().to_string(),
                    link,
                    journal: candidate.journal.filter(|j| !j.trim().is_empty()),
                    date: normalize_date(candidate.date.as_deref()),
                },
            })
        })
        .collect();

    ValidationResult {
        trust_score: score,
        status: ClaimStatus::from_score(score),
        papers,
    }
}

/// Ask for papers about `claim` and weigh them.
#[instrument(skip(service, settings, journals), fields(journal_count = journals.len()))]
pub async fn validate_claim<A>(
    service: &A,
    settings: &AnswerSettings,
    claim: &str,
    journals: &[String],
) -> Result<ValidationResult>
where
    A: AnswerService + ?Sized,
{
    let answer: ResearchPapersAnswer = ask(
        service,
        settings,
        RESEARCH_SYSTEM,
        research_papers_prompt(claim, journals),
    )
    .await?;

    let result = weigh_papers(answer.research_papers);

    debug!(
        trust_score = result.trust_score,
        status = %result.status,
        papers = result.papers.len(),
        "Claim validated"
    );

    Ok(result)
}
