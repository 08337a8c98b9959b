// Application setup and router wiring

use std::sync::Arc;

use axum::http::{header::CONTENT_TYPE, Method};
use axum::{
    routing::{get, post},
    Router,
};
use research::{AnswerService, ResearchService, ResearchSettings, ResearchStore};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::server::routes::{
    begin_research_handler, bulk_research_handler, claim_research_handler, health_handler,
    influencer_claims_handler, influencer_handler, influencer_research_handler,
    list_influencers_handler,
};

/// Research service over runtime-selected backends.
pub type SharedResearch = ResearchService<dyn ResearchStore, dyn AnswerService>;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub research: Arc<SharedResearch>,
    /// Model used when a request does not name one
    pub default_model: String,
    /// Present when the Postgres store is in use
    pub db_pool: Option<PgPool>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ResearchStore>,
        answers: Arc<dyn AnswerService>,
        settings: ResearchSettings,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            research: Arc::new(ResearchService::with_settings(store, answers, settings)),
            default_model: default_model.into(),
            db_pool: None,
        }
    }

    pub fn with_db_pool(mut self, pool: PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}

/// Build the Axum application router.
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/api/research/begin", post(begin_research_handler))
        .route("/api/research/bulk", post(bulk_research_handler))
        .route("/api/research/influencer", post(influencer_research_handler))
        .route("/api/research/claim", post(claim_research_handler))
        .route("/api/influencers", get(list_influencers_handler))
        .route("/api/influencers/:id", get(influencer_handler))
        .route("/api/influencers/:id/claims", get(influencer_claims_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
