//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{ResearchError, Result};
use crate::traits::store::ResearchStore;
use crate::types::{
    claim::{Claim, NewClaim},
    ids::{ClaimId, InfluencerId, ResearchPaperId, ResearchRunId},
    influencer::{Influencer, NewInfluencer},
    paper::{ClaimPapers, NewResearchPaper, PaperRole, ResearchPaper},
    run::{ResearchRun, RunKind},
};

#[derive(Default)]
struct Inner {
    runs: HashMap<ResearchRunId, ResearchRun>,
    influencers: Vec<Influencer>,
    claims: Vec<Claim>,
    papers: HashMap<ResearchPaperId, ResearchPaper>,
    links: Vec<(ClaimId, ResearchPaperId, PaperRole)>,
}

/// In-memory storage for all research records.
///
/// Useful for testing and development. Data is lost on restart. Vectors
/// keep insertion order, so listings are in creation order.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn influencer_count(&self) -> usize {
        self.read().influencers.len()
    }

    pub fn claim_count(&self) -> usize {
        self.read().claims.len()
    }

    pub fn paper_count(&self) -> usize {
        self.read().papers.len()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Inner {
    fn run_mut(&mut self, id: ResearchRunId) -> Result<&mut ResearchRun> {
        self.runs
            .get_mut(&id)
            .ok_or_else(|| ResearchError::not_found("research run", id))
    }
}

#[async_trait]
impl ResearchStore for MemoryStore {
    async fn create_run(&self, kind: RunKind) -> Result<ResearchRun> {
        let now = Utc::now();
        let run = ResearchRun {
            id: ResearchRunId::new(),
            kind,
            failed: false,
            influencer_ids: Vec::new(),
            influencer_id: None,
            claim_id: None,
            created_at: now,
            updated_at: now,
        };
        self.write().runs.insert(run.id, run.clone());
        Ok(run)
    }

    async fn find_run(&self, id: ResearchRunId) -> Result<Option<ResearchRun>> {
        Ok(self.read().runs.get(&id).cloned())
    }

    async fn mark_run_failed(&self, id: ResearchRunId) -> Result<()> {
        let mut inner = self.write();
        let run = inner.run_mut(id)?;
        run.failed = true;
        run.updated_at = Utc::now();
        Ok(())
    }

    async fn touch_run(&self, id: ResearchRunId) -> Result<()> {
        let mut inner = self.write();
        inner.run_mut(id)?.updated_at = Utc::now();
        Ok(())
    }

    async fn add_run_influencer(
        &self,
        run_id: ResearchRunId,
        influencer_id: InfluencerId,
    ) -> Result<()> {
        let mut inner = self.write();
        let run = inner.run_mut(run_id)?;
        if !run.influencer_ids.contains(&influencer_id) {
            run.influencer_ids.push(influencer_id);
        }
        run.updated_at = Utc::now();
        Ok(())
    }

    async fn set_run_influencer(
        &self,
        run_id: ResearchRunId,
        influencer_id: InfluencerId,
    ) -> Result<()> {
        let mut inner = self.write();
        let run = inner.run_mut(run_id)?;
        run.influencer_id = Some(influencer_id);
        run.updated_at = Utc::now();
        Ok(())
    }

    async fn set_run_claim(&self, run_id: ResearchRunId, claim_id: ClaimId) -> Result<()> {
        let mut inner = self.write();
        let run = inner.run_mut(run_id)?;
        run.claim_id = Some(claim_id);
        run.updated_at = Utc::now();
        Ok(())
    }

    async fn find_influencer(&self, id: InfluencerId) -> Result<Option<Influencer>> {
        Ok(self.read().influencers.iter().find(|i| i.id == id).cloned())
    }

    async fn find_influencer_by_name(&self, name: &str) -> Result<Option<Influencer>> {
        Ok(self
            .read()
            .influencers
            .iter()
            .find(|i| i.name == name)
            .cloned())
    }

    async fn get_or_create_influencer(&self, new: &NewInfluencer) -> Result<(Influencer, bool)> {
        let mut inner = self.write();
        if let Some(existing) = inner.influencers.iter().find(|i| i.name == new.name) {
            return Ok((existing.clone(), false));
        }

        let influencer = Influencer {
            id: InfluencerId::new(),
            name: new.name.clone(),
            profile_picture: new.profile_picture.clone(),
            bio: new.bio.clone(),
            category: new.category.clone(),
            followers: new.followers,
            trust_score: None,
            created_at: Utc::now(),
        };
        inner.influencers.push(influencer.clone());
        Ok((influencer, true))
    }

    async fn list_influencers(&self) -> Result<Vec<Influencer>> {
        Ok(self.read().influencers.clone())
    }

    async fn set_influencer_trust_score(&self, id: InfluencerId, score: Option<f64>) -> Result<()> {
        let mut inner = self.write();
        let influencer = inner
            .influencers
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| ResearchError::not_found("influencer", id))?;
        influencer.trust_score = score;
        Ok(())
    }

    async fn create_claim(&self, new: &NewClaim) -> Result<Claim> {
        let mut inner = self.write();
        if !inner.influencers.iter().any(|i| i.id == new.influencer_id) {
            return Err(ResearchError::not_found("influencer", new.influencer_id));
        }

        let claim = Claim {
            id: ClaimId::new(),
            influencer_id: new.influencer_id,
            claim: new.claim.clone(),
            source: new.source.clone(),
            category: new.category.clone(),
            date: new.date,
            trust_score: new.trust_score,
            status: new.status(),
            created_at: Utc::now(),
        };
        inner.claims.push(claim.clone());
        Ok(claim)
    }

    async fn find_claim(&self, id: ClaimId) -> Result<Option<Claim>> {
        Ok(self.read().claims.iter().find(|c| c.id == id).cloned())
    }

    async fn claims_for_influencer(&self, influencer_id: InfluencerId) -> Result<Vec<Claim>> {
        Ok(self
            .read()
            .claims
            .iter()
            .filter(|c| c.influencer_id == influencer_id)
            .cloned()
            .collect())
    }

    async fn create_research_paper(&self, new: &NewResearchPaper) -> Result<ResearchPaper> {
        let paper = ResearchPaper {
            id: ResearchPaperId::new(),
            title: new.title.clone(),
            link: new.link.clone(),
            journal: new.journal.clone(),
            date: new.date,
            created_at: Utc::now(),
        };
        self.write().papers.insert(paper.id, paper.clone());
        Ok(paper)
    }

    async fn attach_paper(
        &self,
        claim_id: ClaimId,
        paper_id: ResearchPaperId,
        role: PaperRole,
    ) -> Result<()> {
        let mut inner = self.write();
        if !inner.claims.iter().any(|c| c.id == claim_id) {
            return Err(ResearchError::not_found("claim", claim_id));
        }
        if !inner.papers.contains_key(&paper_id) {
            return Err(ResearchError::not_found("research paper", paper_id));
        }

        inner
            .links
            .retain(|(c, p, _)| !(*c == claim_id && *p == paper_id));
        inner.links.push((claim_id, paper_id, role));
        Ok(())
    }

    async fn detach_paper(&self, claim_id: ClaimId, paper_id: ResearchPaperId) -> Result<()> {
        self.write()
            .links
            .retain(|(c, p, _)| !(*c == claim_id && *p == paper_id));
        Ok(())
    }

    async fn papers_for_claim(&self, claim_id: ClaimId) -> Result<ClaimPapers> {
        let inner = self.read();
        let mut papers = ClaimPapers::default();
        for (c, p, role) in &inner.links {
            if *c != claim_id {
                continue;
            }
            let Some(paper) = inner.papers.get(p) else {
                continue;
            };
            match role {
                PaperRole::Evidence => papers.evidence.push(paper.clone()),
                PaperRole::CounterEvidence => papers.counter_evidence.push(paper.clone()),
            }
        }
        Ok(papers)
    }
}
