// Read endpoints for influencers and their scored claims

use axum::{
    extract::{Path, State},
    Json,
};
use research::{ClaimWithPapers, Influencer, InfluencerId, ResearchError};

use crate::server::app::AppState;
use crate::server::error::ApiResult;

fn parse_influencer_id(raw: &str) -> Result<InfluencerId, ResearchError> {
    InfluencerId::parse(raw)
        .map_err(|_| ResearchError::InvalidInput("Influencer ID is invalid".into()))
}

/// GET /api/influencers
pub async fn list_influencers_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Influencer>>> {
    Ok(Json(state.research.list_influencers().await?))
}

/// GET /api/influencers/:id
pub async fn influencer_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Influencer>> {
    let id = parse_influencer_id(&id)?;
    Ok(Json(state.research.influencer(id).await?))
}

/// GET /api/influencers/:id/claims
pub async fn influencer_claims_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<ClaimWithPapers>>> {
    let id = parse_influencer_id(&id)?;
    Ok(Json(state.research.influencer_claims(id).await?))
}
