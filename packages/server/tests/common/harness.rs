//! Test harness driving the router in-process.
//!
//! Requests go through `tower::ServiceExt::oneshot` against an app backed by
//! the in-memory store and canned answers, so no network or database is used.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use research::testing::MockAnswerService;
use research::{MemoryStore, ResearchSettings};
use serde_json::Value;
use server_core::server::{build_app, AppState};
use tower::ServiceExt;

pub const TEST_MODEL: &str = "sonar-test";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub answers: MockAnswerService,
}

impl TestApp {
    pub fn new(answers: MockAnswerService) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(
            store.clone(),
            Arc::new(answers.clone()),
            ResearchSettings::new(),
            TEST_MODEL,
        );

        Self {
            router: build_app(state),
            store,
            answers,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    /// Begin a run and return its id.
    pub async fn begin(&self, research_type: &str) -> String {
        let (status, body) = self
            .post(
                &format!("/api/research/begin?research_type={}", research_type),
                Value::Null,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "begin failed: {}", body);
        body["research_id"].as_str().unwrap().to_string()
    }
}
