//! Integration tests for research runs.
//!
//! These drive the research service end to end against the in-memory store
//! and canned answers:
//! 1. Look up or discover influencers
//! 2. Discover their claims
//! 3. Validate each claim against research papers
//! 4. Deduplicate, persist and aggregate

use std::sync::Arc;

use research::testing::{
    claims_answer, influencer_answer, influencers_answer, papers_answer, MockAnswerService,
};
use research::{
    AnswerSettings, BulkRequest, ClaimStatus, MemoryStore, ResearchError, ResearchService,
    ResearchStore, RunKind, SingleClaimRequest, SingleInfluencerRequest, DEFAULT_INFLUENCER_NAME,
};

const CLAIM_A: &str = "Cold plunges increase dopamine levels";
const CLAIM_B: &str = "Seed oils cause chronic inflammation";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("research=debug")
        .with_test_writer()
        .try_init();
}

/// Canned answers for influencer "X" with claims A (3 for, 1 against) and B (no papers).
fn mock_for_x() -> MockAnswerService {
    MockAnswerService::new()
        .respond_json("information about the influencer X.", influencer_answer("X"))
        .respond_json("health claims for the influencer X.", claims_answer(&[CLAIM_A, CLAIM_B]))
        .respond_json(
            &format!("the claim: '{}'", CLAIM_A),
            papers_answer(&[
                ("https://pubmed.example/1", true),
                ("https://pubmed.example/2", true),
                ("https://pubmed.example/3", true),
                ("https://pubmed.example/4", false),
            ]),
        )
        .respond_json(&format!("the claim: '{}'", CLAIM_B), papers_answer(&[]))
}

fn setup(
    mock: MockAnswerService,
) -> (
    ResearchService<MemoryStore, MockAnswerService>,
    Arc<MemoryStore>,
    MockAnswerService,
) {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let service = ResearchService::new(store.clone(), Arc::new(mock.clone()));
    (service, store, mock)
}

#[tokio::test]
async fn test_single_influencer_aggregates_claim_scores() {
    let (service, store, _) = setup(mock_for_x());
    let run = service.begin_run(RunKind::Single).await.unwrap();

    let outcome = service
        .run_single_influencer(SingleInfluencerRequest {
            run_id: Some(run.id),
            influencer: "X".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(outcome.created);
    assert_eq!(outcome.claims.len(), 2);
    assert_eq!(outcome.claims[0].trust_score, 0.75);
    assert_eq!(outcome.claims[0].status, ClaimStatus::Questionable);
    assert_eq!(outcome.claims[1].trust_score, 0.5);
    assert_eq!(outcome.claims[1].status, ClaimStatus::Questionable);
    assert_eq!(outcome.influencer.trust_score, Some(0.63));

    let papers = store.papers_for_claim(outcome.claims[0].id).await.unwrap();
    assert_eq!(papers.evidence.len(), 3);
    assert_eq!(papers.counter_evidence.len(), 1);

    let run = store.find_run(run.id).await.unwrap().unwrap();
    assert_eq!(run.influencer_id, Some(outcome.influencer.id));
    assert!(!run.failed);
}

#[tokio::test]
async fn test_claim_dates_are_normalized() {
    let mock = MockAnswerService::new()
        .respond_json("information about the influencer Y.", influencer_answer("Y"))
        .respond_json(
            "health claims for the influencer Y.",
            serde_json::json!({
                "health_claims": [
                    {"claim": "Fasting resets the immune system", "date": "2024-02-30"},
                    {"claim": "Magnesium improves deep sleep", "date": "Undated"},
                    {"claim": "Zone 2 training extends lifespan", "date": "2024-02-15"}
                ]
            }),
        )
        .respond_json("the claim:", papers_answer(&[]));
    let (service, _, _) = setup(mock);
    let run = service.begin_run(RunKind::Single).await.unwrap();

    let outcome = service
        .run_single_influencer(SingleInfluencerRequest {
            run_id: Some(run.id),
            influencer: "Y".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    let dates: Vec<_> = outcome.claims.iter().map(|c| c.date).collect();
    assert_eq!(dates[0], None);
    assert_eq!(dates[1], None);
    assert_eq!(
        dates[2],
        chrono::NaiveDate::from_ymd_opt(2024, 2, 15)
    );
}

#[tokio::test]
async fn test_rerun_discards_duplicate_claims() {
    let (service, store, _) = setup(mock_for_x());

    for _ in 0..2 {
        let run = service.begin_run(RunKind::Single).await.unwrap();
        service
            .run_single_influencer(SingleInfluencerRequest {
                run_id: Some(run.id),
                influencer: "X".into(),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    let run = service.begin_run(RunKind::Single).await.unwrap();
    let outcome = service
        .run_single_influencer(SingleInfluencerRequest {
            run_id: Some(run.id),
            influencer: "X".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(!outcome.created);
    assert!(outcome.claims.is_empty());
    assert_eq!(outcome.duplicates, 2);
    assert_eq!(outcome.influencer.trust_score, Some(0.63));
    assert_eq!(store.influencer_count(), 1);
    assert_eq!(store.claim_count(), 2);
}

#[tokio::test]
async fn test_single_claim_is_not_deduplicated() {
    let mock = MockAnswerService::new().respond_json(
        "the claim: 'Creatine improves memory'",
        papers_answer(&[("https://a", true), ("https://b", false)]),
    );
    let (service, store, _) = setup(mock);

    let first = service
        .run_single_claim(SingleClaimRequest {
            claim: "Creatine improves memory".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    let second = service
        .run_single_claim(SingleClaimRequest {
            claim: "Creatine improves memory".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_ne!(first.run_id, second.run_id);
    assert_ne!(first.claim.claim.id, second.claim.claim.id);
    assert_eq!(first.influencer.id, second.influencer.id);
    assert_eq!(first.influencer.name, DEFAULT_INFLUENCER_NAME);
    assert_eq!(first.claim.claim.trust_score, 0.5);
    assert_eq!(first.claim.evidence.len(), 1);
    assert_eq!(first.claim.counter_evidence.len(), 1);

    assert_eq!(store.influencer_count(), 1);
    assert_eq!(store.claim_count(), 2);
    assert_eq!(store.paper_count(), 4);

    let run = store.find_run(second.run_id).await.unwrap().unwrap();
    assert_eq!(run.kind, RunKind::Claim);
    assert_eq!(run.claim_id, Some(second.claim.claim.id));
}

#[tokio::test]
async fn test_single_claim_uses_begun_run() {
    let mock = MockAnswerService::new().respond_json("the claim:", papers_answer(&[]));
    let (service, _, _) = setup(mock);
    let run = service.begin_run(RunKind::Claim).await.unwrap();

    let outcome = service
        .run_single_claim(SingleClaimRequest {
            run_id: Some(run.id),
            claim: "Red light therapy heals skin".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(outcome.run_id, run.id);
    assert_eq!(outcome.influencer.trust_score, Some(0.5));
}

#[tokio::test]
async fn test_bulk_isolates_failed_influencer() {
    let mock = MockAnswerService::new()
        .respond_json("Find top influencers", influencers_answer(&["Ann", "Bob", "Cat"]))
        .fail_when("health claims for the influencer Bob.", "rate limited")
        .respond_json(
            "health claims for the influencer Ann.",
            claims_answer(&["Sauna use lowers cardiovascular risk"]),
        )
        .respond_json(
            "health claims for the influencer Cat.",
            claims_answer(&["Blue light glasses prevent insomnia"]),
        )
        .respond_json("the claim:", papers_answer(&[("https://a", true)]));
    let (service, store, _) = setup(mock);
    let run = service.begin_run(RunKind::Bulk).await.unwrap();

    let outcome = service
        .run_bulk(BulkRequest {
            run_id: Some(run.id),
            ..Default::default()
        })
        .await
        .unwrap();

    let names: Vec<&str> = outcome
        .influencers
        .iter()
        .map(|o| o.influencer.name.as_str())
        .collect();
    assert_eq!(names, vec!["Ann", "Cat"]);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].influencer, "Bob");

    let run = store.find_run(run.id).await.unwrap().unwrap();
    assert!(!run.failed);
    assert_eq!(run.influencer_ids.len(), 2);
    assert_eq!(store.influencer_count(), 2);
}

#[tokio::test]
async fn test_bulk_fails_run_when_discovery_fails() {
    let mock = MockAnswerService::new().fail_when("Find top influencers", "service down");
    let (service, store, _) = setup(mock);
    let run = service.begin_run(RunKind::Bulk).await.unwrap();

    let err = service
        .run_bulk(BulkRequest {
            run_id: Some(run.id),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ResearchError::Upstream(_)));
    assert!(store.find_run(run.id).await.unwrap().unwrap().failed);
}

#[tokio::test]
async fn test_bulk_reuses_existing_influencer_and_passes_options() {
    let mock = MockAnswerService::new()
        .respond_json("Find top influencers", influencers_answer(&["Ann"]))
        .respond_json(
            "health claims for the influencer Ann.",
            claims_answer(&["Sauna use lowers cardiovascular risk"]),
        )
        .respond_json("the claim:", papers_answer(&[]));
    let (service, store, mock) = setup(mock);

    store
        .get_or_create_influencer(&research::NewInfluencer::named("Ann"))
        .await
        .unwrap();
    let run = service.begin_run(RunKind::Bulk).await.unwrap();

    let outcome = service
        .run_bulk(BulkRequest {
            run_id: Some(run.id),
            answer: AnswerSettings::from_parts(Some("pplx-test".into()), Some("sonar-pro".into())),
            journals: Some(vec!["Cell".into()]),
            note: Some("Focus on sleep".into()),
            count: Some(1),
            claim_count: Some(3),
            exclude: vec!["Peter Attia".into()],
            timeframe: Some("2024".into()),
        })
        .await
        .unwrap();

    assert!(!outcome.influencers[0].created);
    assert_eq!(store.influencer_count(), 1);

    let discover = &mock.calls_for("InfluencersAnswer")[0];
    assert!(discover.prompt.contains("Peter Attia"));
    assert!(discover.prompt.contains("maximum of 1 influencers"));
    assert_eq!(discover.model, "sonar-pro");
    assert!(discover.has_api_key);

    let claims = &mock.calls_for("HealthClaimsAnswer")[0];
    assert!(claims.prompt.starts_with("Find 2024 health claims"));
    assert!(claims.prompt.contains("Notes for research assistant: Focus on sleep"));
    assert!(claims.prompt.contains("exactly 3 health claims"));

    let papers = &mock.calls_for("ResearchPapersAnswer")[0];
    assert!(papers.prompt.contains("journals: Cell."));
}

#[tokio::test]
async fn test_malformed_answer_fails_run() {
    let mock = MockAnswerService::new()
        .respond_when("information about the influencer Z.", "```json\nnot json at all\n```");
    let (service, store, _) = setup(mock);
    let run = service.begin_run(RunKind::Single).await.unwrap();

    let err = service
        .run_single_influencer(SingleInfluencerRequest {
            run_id: Some(run.id),
            influencer: "Z".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ResearchError::UpstreamMalformed(_)));
    assert!(store.find_run(run.id).await.unwrap().unwrap().failed);
    assert_eq!(store.influencer_count(), 0);
}

#[tokio::test]
async fn test_failed_claim_validation_is_skipped() {
    let mock = MockAnswerService::new()
        .respond_json("information about the influencer X.", influencer_answer("X"))
        .respond_json("health claims for the influencer X.", claims_answer(&[CLAIM_A, CLAIM_B]))
        .respond_when(&format!("the claim: '{}'", CLAIM_A), "{\"papers\": []}")
        .respond_json(&format!("the claim: '{}'", CLAIM_B), papers_answer(&[("https://a", false)]));
    let (service, _, _) = setup(mock);
    let run = service.begin_run(RunKind::Single).await.unwrap();

    let outcome = service
        .run_single_influencer(SingleInfluencerRequest {
            run_id: Some(run.id),
            influencer: "X".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(outcome.claims.len(), 1);
    assert_eq!(outcome.claims[0].claim, CLAIM_B);
    assert_eq!(outcome.claims[0].status, ClaimStatus::Debunked);
    assert_eq!(outcome.influencer.trust_score, Some(0.0));
}

#[tokio::test]
async fn test_run_id_checks() {
    let (service, _, mock) = setup(mock_for_x());

    let err = service
        .run_single_influencer(SingleInfluencerRequest {
            influencer: "X".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Research ID is required");

    let err = service
        .run_bulk(BulkRequest {
            run_id: Some(research::ResearchRunId::new()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ResearchError::NotFound { .. }));

    let bulk = service.begin_run(RunKind::Bulk).await.unwrap();
    let err = service
        .run_single_influencer(SingleInfluencerRequest {
            run_id: Some(bulk.id),
            influencer: "X".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ResearchError::InvalidInput(_)));

    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_read_influencer_claims_with_papers() {
    let (service, _, _) = setup(mock_for_x());
    let run = service.begin_run(RunKind::Single).await.unwrap();
    let outcome = service
        .run_single_influencer(SingleInfluencerRequest {
            run_id: Some(run.id),
            influencer: "X".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    let claims = service
        .influencer_claims(outcome.influencer.id)
        .await
        .unwrap();
    assert_eq!(claims.len(), 2);
    assert_eq!(claims[0].claim.claim, CLAIM_A);
    assert_eq!(claims[0].evidence.len(), 3);
    assert!(claims[1].evidence.is_empty());

    let err = service
        .influencer(research::InfluencerId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ResearchError::NotFound { .. }));
}

#[tokio::test]
async fn test_restated_claim_with_extra_words_is_discarded() {
    let first = MockAnswerService::new()
        .respond_json("information about the influencer Z.", influencer_answer("Z"))
        .respond_json(
            "health claims for the influencer Z.",
            claims_answer(&["Vitamin D deficiency weakens immunity"]),
        )
        .respond_json("the claim:", papers_answer(&[("https://a", true)]));
    let second = MockAnswerService::new()
        .respond_json("information about the influencer Z.", influencer_answer("Z"))
        .respond_json(
            "health claims for the influencer Z.",
            claims_answer(&["Vitamin D deficiency weakens immunity in older adults during winter"]),
        )
        .respond_json("the claim:", papers_answer(&[("https://b", false)]));

    init_tracing();
    let store = Arc::new(MemoryStore::new());
    for mock in [first, second] {
        let service = ResearchService::new(store.clone(), Arc::new(mock));
        let run = service.begin_run(RunKind::Single).await.unwrap();
        service
            .run_single_influencer(SingleInfluencerRequest {
                run_id: Some(run.id),
                influencer: "Z".into(),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    assert_eq!(store.claim_count(), 1);
    let influencer = store.find_influencer_by_name("Z").await.unwrap().unwrap();
    assert_eq!(influencer.trust_score, Some(1.0));
}

#[tokio::test]
async fn test_influencer_without_claims_keeps_unset_score() {
    let mock = MockAnswerService::new()
        .respond_json("information about the influencer W.", influencer_answer("W"))
        .respond_json("health claims for the influencer W.", claims_answer(&[CLAIM_A, CLAIM_B]))
        .fail_when("the claim:", "answer service timed out");
    let (service, store, _) = setup(mock);
    let run = service.begin_run(RunKind::Single).await.unwrap();

    let outcome = service
        .run_single_influencer(SingleInfluencerRequest {
            run_id: Some(run.id),
            influencer: "W".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(outcome.created);
    assert!(outcome.claims.is_empty());
    assert_eq!(outcome.influencer.trust_score, None);
    assert_eq!(store.claim_count(), 0);

    let run = store.find_run(run.id).await.unwrap().unwrap();
    assert!(!run.failed);
    assert_eq!(run.influencer_id, Some(outcome.influencer.id));
}
