//! # Live Event Stream Handler
//!
//! WebSocket endpoint streaming ordered mission frames to dashboards. Each
//! connection is one hub subscription; a client that cannot keep up is
//! disconnected by the hub rather than allowed to stall the mission.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::broadcast::{StreamFrame, Subscription};
use crate::web::response_types::{ApiError, ApiResult};
use crate::web::state::AppState;

/// Query parameters for stream attachment
#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    /// Resume delivery from this sequence number (served from the retained
    /// backlog; a gap frame precedes replay if it is no longer retained)
    pub from_sequence: Option<u64>,
}

/// Attach a live event stream: GET /v1/missions/:mission_id/ws
pub async fn mission_stream(
    State(state): State<Arc<AppState>>,
    Path(mission_id): Path<Uuid>,
    Query(query): Query<StreamQuery>,
    ws: WebSocketUpgrade,
) -> ApiResult<Response> {
    let subscription = state
        .core
        .subscribe(mission_id, query.from_sequence)
        .map_err(|_| ApiError::NotFound)?;
    Ok(ws.on_upgrade(move |socket| stream_frames(state, socket, subscription)))
}

async fn stream_frames(state: Arc<AppState>, mut socket: WebSocket, mut subscription: Subscription) {
    let mission_id = subscription.mission_id;
    let subscriber_id = subscription.id;
    debug!(
        mission_id = %mission_id,
        subscriber_id = %subscriber_id,
        "📡 Stream attached"
    );

    loop {
        tokio::select! {
            frame = subscription.next_frame() => {
                let Some(frame) = frame else {
                    // Hub dropped us for falling behind; the closed socket
                    // tells the client to resynchronize from a snapshot
                    warn!(
                        mission_id = %mission_id,
                        subscriber_id = %subscriber_id,
                        "Stream ended by hub"
                    );
                    break;
                };
                let end_of_mission = matches!(frame, StreamFrame::EndOfMission { .. });
                let text = match serde_json::to_string(&frame) {
                    Ok(text) => text,
                    Err(error) => {
                        warn!(%error, "Frame serialization failed, closing stream");
                        break;
                    }
                };
                if socket.send(Message::Text(text)).await.is_err() {
                    break;
                }
                if end_of_mission {
                    let _ = socket.send(Message::Close(None)).await;
                    break;
                }
            }
            message = socket.recv() => {
                match message {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // Pings are answered by axum; other client messages are
                    // ignored on this one-way stream
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    state.core.unsubscribe(mission_id, subscriber_id);
    debug!(
        mission_id = %mission_id,
        subscriber_id = %subscriber_id,
        "Stream detached"
    );
}
