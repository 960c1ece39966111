//! # Mission Management Handlers
//!
//! HTTP handlers for mission creation, status retrieval, abort, and the
//! aggregate stats surface consumed by the dashboard.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::models::MissionRequest;
use crate::orchestration::{MissionSnapshot, SystemStats};
use crate::web::response_types::{ApiError, ApiResult};
use crate::web::state::AppState;

/// Response for successful mission creation
#[derive(Debug, Serialize)]
pub struct MissionCreationResponse {
    pub mission_id: Uuid,
    pub name: String,
    pub status: String,
    pub scope_size: usize,
    pub created_at: DateTime<Utc>,
}

/// Create a new mission: POST /v1/missions
pub async fn create_mission(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MissionRequest>,
) -> ApiResult<(StatusCode, Json<MissionCreationResponse>)> {
    let mission = state.core.create_mission(request)?;
    info!(mission_id = %mission.id, name = %mission.name, "Mission created via API");
    Ok((
        StatusCode::CREATED,
        Json(MissionCreationResponse {
            mission_id: mission.id,
            name: mission.name,
            status: mission.status.to_string(),
            scope_size: mission.scope.len(),
            created_at: mission.created_at,
        }),
    ))
}

/// Get a mission snapshot: GET /v1/missions/:mission_id
pub async fn get_mission(
    State(state): State<Arc<AppState>>,
    Path(mission_id): Path<Uuid>,
) -> ApiResult<Json<MissionSnapshot>> {
    let snapshot = state
        .core
        .mission_snapshot(mission_id)
        .await
        .map_err(|_| ApiError::NotFound)?;
    Ok(Json(snapshot))
}

/// Abort response
#[derive(Debug, Serialize)]
pub struct AbortResponse {
    pub mission_id: Uuid,
    pub aborted: bool,
}

/// Abort a mission: POST /v1/missions/:mission_id/abort
///
/// `aborted: false` means the mission was already terminal; the request is
/// still a success because the desired end state holds.
pub async fn abort_mission(
    State(state): State<Arc<AppState>>,
    Path(mission_id): Path<Uuid>,
) -> ApiResult<Json<AbortResponse>> {
    let aborted = state
        .core
        .abort_mission(mission_id)
        .await
        .map_err(|_| ApiError::NotFound)?;
    info!(mission_id = %mission_id, aborted, "Mission abort requested via API");
    Ok(Json(AbortResponse {
        mission_id,
        aborted,
    }))
}

/// Aggregate counters: GET /stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<SystemStats> {
    Json(state.core.stats().await)
}
