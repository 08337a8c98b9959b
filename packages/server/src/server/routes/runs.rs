// Research run endpoints
//
// Runs are begun first and executed with a second call that names the run.

use axum::{
    extract::{Query, State},
    Json,
};
use research::{
    parse_run_id, AnswerSettings, BulkOutcome, BulkRequest, ClaimOutcome, InfluencerOutcome,
    ResearchRunId, RunKind, SingleClaimRequest, SingleInfluencerRequest,
};
use serde::{Deserialize, Serialize};

use crate::server::app::AppState;
use crate::server::error::ApiResult;

#[derive(Debug, Deserialize)]
pub struct BeginParams {
    pub research_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BeginResponse {
    pub research_id: ResearchRunId,
}

/// Answer-service options shared by all run bodies.
#[derive(Debug, Default, Deserialize)]
pub struct AnswerParams {
    #[serde(default, alias = "key")]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

impl AnswerParams {
    fn into_settings(self, default_model: &str) -> AnswerSettings {
        AnswerSettings::from_parts(
            self.api_key,
            self.model.or_else(|| Some(default_model.to_string())),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BulkBody {
    #[serde(default)]
    pub research: Option<String>,
    #[serde(flatten)]
    pub answer: AnswerParams,
    #[serde(default)]
    pub journals: Option<Vec<String>>,
    #[serde(default, alias = "comment")]
    pub note: Option<String>,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub claim_count: Option<usize>,
    #[serde(default, alias = "do_not_repeat")]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub timeframe: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InfluencerBody {
    #[serde(default)]
    pub research: Option<String>,
    #[serde(flatten)]
    pub answer: AnswerParams,
    #[serde(default)]
    pub influencer: String,
    #[serde(default, alias = "max_claims")]
    pub count: Option<usize>,
    #[serde(default)]
    pub timeframe: Option<String>,
    #[serde(default)]
    pub journals: Option<Vec<String>>,
    #[serde(default, alias = "comment")]
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClaimBody {
    /// Optional: a fresh claim run is begun when absent
    #[serde(default)]
    pub research: Option<String>,
    #[serde(flatten)]
    pub answer: AnswerParams,
    #[serde(default)]
    pub claim: String,
    #[serde(default)]
    pub journals: Option<Vec<String>>,
}

/// POST /api/research/begin?research_type=bulk|single|claim
pub async fn begin_research_handler(
    State(state): State<AppState>,
    Query(params): Query<BeginParams>,
) -> ApiResult<Json<BeginResponse>> {
    let kind: RunKind = params.research_type.as_deref().unwrap_or_default().parse()?;
    let run = state.research.begin_run(kind).await?;
    Ok(Json(BeginResponse {
        research_id: run.id,
    }))
}

/// POST /api/research/bulk
pub async fn bulk_research_handler(
    State(state): State<AppState>,
    Json(body): Json<BulkBody>,
) -> ApiResult<Json<BulkOutcome>> {
    let run_id = parse_run_id(body.research.as_deref())?;
    let outcome = state
        .research
        .run_bulk(BulkRequest {
            run_id: Some(run_id),
            answer: body.answer.into_settings(&state.default_model),
            journals: body.journals,
            note: body.note,
            count: body.count,
            claim_count: body.claim_count,
            exclude: body.exclude,
            timeframe: body.timeframe,
        })
        .await?;
    Ok(Json(outcome))
}

/// POST /api/research/influencer
pub async fn influencer_research_handler(
    State(state): State<AppState>,
    Json(body): Json<InfluencerBody>,
) -> ApiResult<Json<InfluencerOutcome>> {
    let run_id = parse_run_id(body.research.as_deref())?;
    let outcome = state
        .research
        .run_single_influencer(SingleInfluencerRequest {
            run_id: Some(run_id),
            answer: body.answer.into_settings(&state.default_model),
            influencer: body.influencer,
            count: body.count,
            timeframe: body.timeframe,
            journals: body.journals,
            note: body.note,
        })
        .await?;
    Ok(Json(outcome))
}

/// POST /api/research/claim
pub async fn claim_research_handler(
    State(state): State<AppState>,
    Json(body): Json<ClaimBody>,
) -> ApiResult<Json<ClaimOutcome>> {
    let run_id = match body.research.as_deref() {
        Some(raw) => Some(parse_run_id(Some(raw))?),
        None => None,
    };
    let outcome = state
        .research
        .run_single_claim(SingleClaimRequest {
            run_id,
            answer: body.answer.into_settings(&state.default_model),
            claim: body.claim,
            journals: body.journals,
        })
        .await?;
    Ok(Json(outcome))
}
