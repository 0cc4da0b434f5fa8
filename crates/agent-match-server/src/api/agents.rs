//! Agent registration, matching and lookup handlers

use axum::{
    extract::{rejection::{JsonRejection, PathRejection, QueryRejection}, Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use agent_match_core::{AgentId, AgentMetadata, CoreError, MatchResult, DEFAULT_TOP_K};

use super::errors::ApiError;
use super::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub id: AgentId,
    pub metadata: AgentMetadata,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RegisterResponse {
    pub message: String,
    pub agent_id: AgentId,
}

/// Query is either explicit metadata or the stored metadata of `id`.
/// When both are given, `metadata` wins.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub id: Option<AgentId>,
    #[serde(default)]
    pub metadata: Option<AgentMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct MatchParams {
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AgentView {
    pub id: AgentId,
    pub metadata: AgentMetadata,
    pub created_at: DateTime<Utc>,
}

/// `POST /api/v1/register-agent`
#[instrument(skip_all)]
pub async fn register_agent(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let Json(request) = body?;

    let agent_id = state.service.register(request.id, request.metadata).await?;
    info!(agent_id = %agent_id, "Registered agent via API");

    Ok(Json(RegisterResponse {
        message: "Agent registered successfully".to_string(),
        agent_id,
    }))
}

/// `POST /api/v1/match-agent?top_k=N`
#[instrument(skip_all)]
pub async fn match_agent(
    State(state): State<AppState>,
    params: Result<Query<MatchParams>, QueryRejection>,
    body: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<Vec<MatchResult>>, ApiError> {
    let Query(params) = params?;
    let Json(request) = body?;
    let top_k = params.top_k.unwrap_or(DEFAULT_TOP_K);

    let results = match (request.metadata, request.id) {
        (Some(metadata), _) => state.service.find_matches(&metadata, top_k).await?,
        (None, Some(id)) => state.service.find_matches_for_agent(&id, top_k).await?,
        (None, None) => {
            return Err(CoreError::ValidationError(
                "request must contain 'metadata' or 'id'".to_string(),
            )
            .into())
        }
    };

    Ok(Json(results))
}

/// `GET /api/v1/agents/:id`
#[instrument(skip_all)]
pub async fn get_agent(
    State(state): State<AppState>,
    id: Result<Path<AgentId>, PathRejection>,
) -> Result<Json<AgentView>, ApiError> {
    let Path(id) = id?;

    let record = state
        .service
        .get_agent(&id)
        .await?
        .ok_or(CoreError::NotFound(id))?;

    Ok(Json(AgentView {
        id: record.id,
        metadata: record.metadata,
        created_at: record.created_at,
    }))
}
