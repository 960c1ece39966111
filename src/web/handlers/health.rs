//! # Health Check Handlers
//!
//! Kubernetes-compatible health check endpoints for monitoring and load
//! balancing.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::web::state::AppState;

/// Basic health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
}

/// Detailed health check response
#[derive(Serialize)]
pub struct DetailedHealthResponse {
    status: String,
    timestamp: String,
    environment: String,
    uptime_seconds: i64,
    active_missions: usize,
    total_missions: usize,
}

/// Basic health check endpoint: GET /health
///
/// Always available while the service is running.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Detailed health check endpoint: GET /health/detailed
pub async fn detailed_health_check(
    State(state): State<Arc<AppState>>,
) -> Json<DetailedHealthResponse> {
    let stats = state.core.stats().await;
    Json(DetailedHealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        environment: state.environment.clone(),
        uptime_seconds: (chrono::Utc::now() - state.started_at).num_seconds(),
        active_missions: stats.active_missions,
        total_missions: stats.total_missions,
    })
}
