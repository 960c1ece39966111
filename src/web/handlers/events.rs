//! # Event Ingestion Handler
//!
//! Workers and agents report results here. Submission is acknowledged (202)
//! for anything the core accepted, absorbed as a duplicate, or discarded as
//! stale; only structurally invalid events are rejected (400).

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::debug;

use crate::events::RawEvent;
use crate::orchestration::SubmitOutcome;
use crate::web::response_types::{ApiError, ApiResult};
use crate::web::state::AppState;

/// Acknowledgement returned for a submitted event
#[derive(Debug, Serialize)]
pub struct EventAck {
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Submit a raw event: POST /v1/events
pub async fn submit_event(
    State(state): State<Arc<AppState>>,
    Json(raw): Json<RawEvent>,
) -> ApiResult<(StatusCode, Json<EventAck>)> {
    let outcome = state.core.submit(raw).await?;
    debug!(?outcome, "Event submission handled");

    let ack = match outcome {
        SubmitOutcome::Accepted { sequence } => EventAck {
            outcome: "accepted".to_string(),
            sequence: Some(sequence),
            reason: None,
        },
        SubmitOutcome::Duplicate => EventAck {
            outcome: "duplicate".to_string(),
            sequence: None,
            reason: None,
        },
        SubmitOutcome::Discarded { reason } => EventAck {
            outcome: "discarded".to_string(),
            sequence: None,
            reason: Some(reason),
        },
        SubmitOutcome::Rejected { reason } => {
            return Err(ApiError::EventRejected { reason });
        }
    };

    Ok((StatusCode::ACCEPTED, Json(ack)))
}
