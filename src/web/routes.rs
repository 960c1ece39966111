//! # Web API Routes
//!
//! Route definitions for all orchestrator endpoints organized by
//! functionality.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::web::handlers;
use crate::web::state::AppState;

/// Health check routes for monitoring and Kubernetes probes
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/health/detailed",
            get(handlers::health::detailed_health_check),
        )
}

/// Mission lifecycle and stats routes
pub fn mission_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/missions", post(handlers::missions::create_mission))
        .route(
            "/v1/missions/:mission_id",
            get(handlers::missions::get_mission),
        )
        .route(
            "/v1/missions/:mission_id/abort",
            post(handlers::missions::abort_mission),
        )
        .route("/stats", get(handlers::missions::get_stats))
}

/// Event ingestion routes
pub fn event_routes() -> Router<Arc<AppState>> {
    Router::new().route("/v1/events", post(handlers::events::submit_event))
}

/// WebSocket stream routes
pub fn stream_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/v1/missions/:mission_id/ws",
        get(handlers::stream::mission_stream),
    )
}
