// Main entry point for the research API server

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use research::{
    AnswerService, ApiKey, MemoryStore, PerplexityAnswerService, PostgresStore, ResearchSettings,
    ResearchStore,
};
use server_core::server::{build_app, AppState};
use server_core::Config;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,research=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting health claim research API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    let answers: Arc<dyn AnswerService> = Arc::new(
        PerplexityAnswerService::new(ApiKey::non_empty(config.perplexity_api_key.clone()))
            .with_timeout(Duration::from_secs(config.perplexity_timeout_secs)),
    );
    let settings =
        ResearchSettings::new().with_validation_concurrency(config.research_concurrency);

    let state = match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Database connected");

            let store: Arc<dyn ResearchStore> = Arc::new(
                PostgresStore::from_pool(pool.clone())
                    .await
                    .context("Failed to create research tables")?,
            );
            AppState::new(store, answers, settings, config.perplexity_model.clone())
                .with_db_pool(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, results are kept in memory only");
            let store: Arc<dyn ResearchStore> = Arc::new(MemoryStore::new());
            AppState::new(store, answers, settings, config.perplexity_model.clone())
        }
    };

    if config.perplexity_api_key.is_none() {
        tracing::warn!("PERPLEXITY_API_KEY not set, requests must supply their own key");
    }

    let app = build_app(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
