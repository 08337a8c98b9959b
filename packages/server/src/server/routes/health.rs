use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    store: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<DatabaseHealth>,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    size: u32,
    idle_connections: usize,
}

/// Health check endpoint
///
/// With the Postgres store, checks database connectivity and pool usage.
/// Returns 200 OK when healthy, 503 Service Unavailable otherwise.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let Some(pool) = &state.db_pool else {
        return (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                store: "memory".to_string(),
                database: None,
            }),
        );
    };

    let (status, error) = match tokio::time::timeout(
        std::time::Duration::from_secs(5),
        sqlx::query("SELECT 1").execute(pool),
    )
    .await
    {
        Ok(Ok(_)) => ("ok".to_string(), None),
        Ok(Err(e)) => ("error".to_string(), Some(format!("Query failed: {}", e))),
        Err(_) => ("error".to_string(), Some("Query timeout (>5s)".to_string())),
    };

    let is_healthy = error.is_none();
    let status_code = if is_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(HealthResponse {
            status: if is_healthy { "healthy" } else { "unhealthy" }.to_string(),
            store: "postgres".to_string(),
            database: Some(DatabaseHealth {
                status,
                error,
                size: pool.size(),
                idle_connections: pool.num_idle(),
            }),
        }),
    )
}
