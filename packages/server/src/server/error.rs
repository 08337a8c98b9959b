// Error responses for HTTP handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use research::ResearchError;
use serde_json::json;

/// A research error rendered as `{ "error": message }`.
#[derive(Debug)]
pub struct ApiError(pub ResearchError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ResearchError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ResearchError::NotFound { .. } => StatusCode::NOT_FOUND,
            ResearchError::UpstreamMalformed(_) | ResearchError::Upstream(_) => {
                StatusCode::BAD_GATEWAY
            }
            ResearchError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ResearchError> for ApiError {
    fn from(err: ResearchError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, "Request rejected");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
