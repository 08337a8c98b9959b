//! Integration tests for the research HTTP API.
//!
//! Covers the begin/execute run flow, parameter validation and the read
//! endpoints, all through the real router.

mod common;

use axum::http::StatusCode;
use common::{TestApp, TEST_MODEL};
use research::testing::{
    claims_answer, influencer_answer, influencers_answer, papers_answer, MockAnswerService,
};
use serde_json::json;

const CLAIM: &str = "Creatine improves short-term memory";

fn mock_with_papers() -> MockAnswerService {
    MockAnswerService::new().respond_json(
        "the claim:",
        papers_answer(&[
            ("https://pubmed.example/1", true),
            ("https://pubmed.example/2", true),
            ("https://pubmed.example/3", true),
            ("https://pubmed.example/4", true),
            ("https://pubmed.example/5", false),
        ]),
    )
}

// ============================================================================
// Beginning runs
// ============================================================================

#[tokio::test]
async fn test_begin_returns_research_id() {
    let app = TestApp::new(MockAnswerService::new());

    let (status, body) = app
        .post("/api/research/begin?research_type=bulk", json!(null))
        .await;

    assert_eq!(status, StatusCode::OK);
    let id = body["research_id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
}

#[tokio::test]
async fn test_begin_rejects_unknown_research_type() {
    let app = TestApp::new(MockAnswerService::new());

    let (status, body) = app
        .post("/api/research/begin?research_type=weekly", json!(null))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid research type");
}

#[tokio::test]
async fn test_begin_requires_research_type() {
    let app = TestApp::new(MockAnswerService::new());

    let (status, body) = app.post("/api/research/begin", json!(null)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid research type");
}

// ============================================================================
// Run parameter validation
// ============================================================================

#[tokio::test]
async fn test_bulk_requires_research_id() {
    let app = TestApp::new(MockAnswerService::new());

    let (status, body) = app.post("/api/research/bulk", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Research ID is required");
}

#[tokio::test]
async fn test_influencer_run_rejects_malformed_research_id() {
    let app = TestApp::new(MockAnswerService::new());

    let (status, body) = app
        .post(
            "/api/research/influencer",
            json!({ "research": "not-a-uuid", "influencer": "X" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Research ID is invalid");
}

#[tokio::test]
async fn test_influencer_run_requires_name() {
    let app = TestApp::new(MockAnswerService::new());
    let run_id = app.begin("single").await;

    let (status, body) = app
        .post("/api/research/influencer", json!({ "research": run_id }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Influencer name is required");
    assert!(app.answers.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_research_id_is_not_found() {
    let app = TestApp::new(MockAnswerService::new());

    let (status, _) = app
        .post(
            "/api/research/influencer",
            json!({
                "research": "01890a5d-ac96-774b-bcce-b302099a8057",
                "influencer": "X"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Executing runs
// ============================================================================

#[tokio::test]
async fn test_claim_run_without_research_id_scores_claim() {
    let app = TestApp::new(mock_with_papers());

    let (status, body) = app
        .post("/api/research/claim", json!({ "claim": CLAIM, "key": "pplx-request" }))
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["claim"], CLAIM);
    assert_eq!(body["trust_score"], 0.8);
    assert_eq!(body["status"], "verified");
    assert_eq!(body["evidence"].as_array().unwrap().len(), 4);
    assert_eq!(body["counter_evidence"].as_array().unwrap().len(), 1);
    assert_eq!(body["influencer"]["name"], "Default");
    assert_eq!(app.store.claim_count(), 1);
    assert_eq!(app.store.paper_count(), 5);

    let calls = app.answers.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].model, TEST_MODEL);
    assert!(calls[0].has_api_key);
}

#[tokio::test]
async fn test_claim_run_requires_claim() {
    let app = TestApp::new(MockAnswerService::new());

    let (status, body) = app.post("/api/research/claim", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Claim is required");
    assert_eq!(app.store.claim_count(), 0);
}

#[tokio::test]
async fn test_claim_run_rejects_bulk_research_id() {
    let app = TestApp::new(mock_with_papers());
    let run_id = app.begin("bulk").await;

    let (status, _) = app
        .post("/api/research/claim", json!({ "research": run_id, "claim": CLAIM }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_single_influencer_run_then_read_back() {
    let mock = MockAnswerService::new()
        .respond_json("information about the influencer X.", influencer_answer("X"))
        .respond_json("health claims for the influencer X.", claims_answer(&[CLAIM]))
        .respond_json(
            "the claim:",
            papers_answer(&[
                ("https://pubmed.example/1", true),
                ("https://pubmed.example/2", false),
            ]),
        );
    let app = TestApp::new(mock);
    let run_id = app.begin("single").await;

    let (status, body) = app
        .post(
            "/api/research/influencer",
            json!({
                "research": run_id,
                "influencer": "X",
                "max_claims": 3,
                "model": "sonar-pro"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["created"], true);
    assert_eq!(body["influencer"]["trust_score"], 0.5);
    let influencer_id = body["influencer"]["id"].as_str().unwrap().to_string();

    let claim_calls = app.answers.calls_for("HealthClaimsAnswer");
    assert_eq!(claim_calls.len(), 1);
    assert_eq!(claim_calls[0].model, "sonar-pro");
    assert!(claim_calls[0].prompt.contains("Return exactly 3 health claims."));

    let (status, list) = app.get("/api/influencers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, influencer) = app.get(&format!("/api/influencers/{}", influencer_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(influencer["name"], "X");

    let (status, claims) = app
        .get(&format!("/api/influencers/{}/claims", influencer_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    let claims = claims.as_array().unwrap();
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0]["claim"], CLAIM);
    assert_eq!(claims[0]["evidence"].as_array().unwrap().len(), 1);
    assert_eq!(claims[0]["counter_evidence"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_bulk_run_accepts_legacy_parameter_names() {
    let mock = MockAnswerService::new()
        .respond_json("top influencers", influencers_answer(&["Ann", "Bob"]))
        .respond_json("health claims for the influencer Ann.", claims_answer(&[CLAIM]))
        .respond_json("the claim:", papers_answer(&[]));
    let app = TestApp::new(mock);
    let run_id = app.begin("bulk").await;

    let (status, body) = app
        .post(
            "/api/research/bulk",
            json!({
                "research": run_id,
                "count": 2,
                "claim_count": 1,
                "comment": "Focus on sleep",
                "do_not_repeat": ["Bob"]
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    let influencers = body["influencers"].as_array().unwrap();
    assert_eq!(influencers.len(), 1);
    assert_eq!(influencers[0]["influencer"]["name"], "Ann");
    assert!(body["failures"].as_array().unwrap().is_empty());

    let discovery = app.answers.calls_for("InfluencersAnswer");
    assert_eq!(discovery.len(), 1);
    assert!(discovery[0].prompt.contains("Do not include the following influencers: Bob."));

    let claims = app.answers.calls_for("HealthClaimsAnswer");
    assert!(claims[0].prompt.contains("Notes for research assistant: Focus on sleep"));
}

#[tokio::test]
async fn test_upstream_failure_maps_to_bad_gateway() {
    let mock = MockAnswerService::new().fail_when("the claim:", "rate limited");
    let app = TestApp::new(mock);

    let (status, body) = app
        .post("/api/research/claim", json!({ "claim": CLAIM }))
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("rate limited"));
}

// ============================================================================
// Reads
// ============================================================================

#[tokio::test]
async fn test_unknown_influencer_is_not_found() {
    let app = TestApp::new(MockAnswerService::new());

    let (status, _) = app
        .get("/api/influencers/01890a5d-ac96-774b-bcce-b302099a8057")
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_influencer_id_is_bad_request() {
    let app = TestApp::new(MockAnswerService::new());

    let (status, body) = app.get("/api/influencers/abc/claims").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Influencer ID is invalid");
}

#[tokio::test]
async fn test_health_reports_memory_store() {
    let app = TestApp::new(MockAnswerService::new());

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "memory");
}
