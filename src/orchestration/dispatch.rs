//! # Dispatch Coordinator
//!
//! Turns state machine decisions into outbound work requests and owns their
//! lifecycle: correlation tracking, deadline timers, exponential backoff
//! retries, and exhaustion reporting back into the mission actor. Timers run
//! on their own tokio tasks; completion re-enters the core only through the
//! per-mission command channel, never by mutating state directly.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::mission_actor::MissionCommand;
use super::types::WorkRequest;
use crate::config::DispatchConfig;
use crate::messaging::{EventBus, WorkMessage};
use crate::state_machine::WorkStage;

struct InFlight {
    request: WorkRequest,
    actor_tx: mpsc::Sender<MissionCommand>,
}

/// Correlates outbound work with worker results and enforces deadlines
pub struct DispatchCoordinator {
    config: DispatchConfig,
    bus: Arc<dyn EventBus>,
    in_flight: DashMap<Uuid, InFlight>,
}

impl DispatchCoordinator {
    pub fn new(config: DispatchConfig, bus: Arc<dyn EventBus>) -> Arc<Self> {
        Arc::new(Self {
            config,
            bus,
            in_flight: DashMap::new(),
        })
    }

    /// Issue a work request for a mission target
    ///
    /// Publishing to the bus and the deadline timer both run on spawned
    /// tasks, so the caller (the mission actor) never waits on transport I/O.
    pub fn dispatch(
        self: &Arc<Self>,
        mission_id: Uuid,
        target_id: Uuid,
        stage: WorkStage,
        actor_tx: mpsc::Sender<MissionCommand>,
    ) -> WorkRequest {
        let request = WorkRequest {
            correlation_id: Uuid::new_v4(),
            mission_id,
            target_id,
            stage,
            issued_at: chrono::Utc::now(),
            retry_count: 0,
            deadline_ms: self.config.backoff_delay(1).as_millis() as u64,
        };
        self.launch(request.clone(), actor_tx);
        request
    }

    /// Resolve a correlation id against an in-flight request
    ///
    /// Returns false when the id is unknown: already resolved, timed out, or
    /// cancelled. The caller's dedup set decides what that means.
    pub fn on_result(&self, correlation_id: Uuid) -> bool {
        let resolved = self.in_flight.remove(&correlation_id).is_some();
        if resolved {
            debug!(correlation_id = %correlation_id, "Work request resolved");
        }
        resolved
    }

    /// Whether any request is outstanding for the given target
    pub fn has_inflight_for_target(&self, target_id: Uuid) -> bool {
        self.in_flight
            .iter()
            .any(|entry| entry.request.target_id == target_id)
    }

    /// Best-effort cancellation of all outstanding requests for a mission;
    /// in-flight worker operations are not stopped, but their late results
    /// will no longer match any correlation id
    pub fn cancel_mission(&self, mission_id: Uuid) {
        self.in_flight
            .retain(|_, entry| entry.request.mission_id != mission_id);
    }

    /// Outstanding request count, for diagnostics
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    fn launch(self: &Arc<Self>, request: WorkRequest, actor_tx: mpsc::Sender<MissionCommand>) {
        let correlation_id = request.correlation_id;
        let message = WorkMessage::new(
            correlation_id,
            request.mission_id,
            request.target_id,
            request.stage,
            serde_json::Value::Null,
            request.retry_count,
            self.config.max_retries,
            request.deadline_ms,
        );
        let deadline = self.config.backoff_delay(request.retry_count + 1);

        self.in_flight.insert(
            correlation_id,
            InFlight {
                request,
                actor_tx,
            },
        );

        let bus = Arc::clone(&self.bus);
        tokio::spawn(async move {
            if let Err(err) = bus.publish_work(message).await {
                // The deadline timer turns a lost publish into a retry
                error!(correlation_id = %correlation_id, error = %err, "Work publish failed");
            }
        });

        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            coordinator.handle_expiry(correlation_id);
        });
    }

    fn handle_expiry(self: &Arc<Self>, correlation_id: Uuid) {
        // A resolved or cancelled request leaves nothing to expire
        let Some((_, entry)) = self.in_flight.remove(&correlation_id) else {
            return;
        };
        let InFlight { request, actor_tx } = entry;

        let next_retry = request.retry_count + 1;
        if next_retry < self.config.max_retries {
            let retry = WorkRequest {
                correlation_id: Uuid::new_v4(),
                retry_count: next_retry,
                deadline_ms: self.config.backoff_delay(next_retry + 1).as_millis() as u64,
                issued_at: chrono::Utc::now(),
                ..request
            };
            warn!(
                mission_id = %retry.mission_id,
                target_id = %retry.target_id,
                stage = %retry.stage,
                retry_count = retry.retry_count,
                expired_correlation_id = %correlation_id,
                "Work request deadline expired, retrying"
            );
            let record = retry.clone();
            self.launch(retry, actor_tx.clone());
            let coordinator_tx = actor_tx;
            tokio::spawn(async move {
                let _ = coordinator_tx
                    .send(MissionCommand::RecordDispatch { request: record })
                    .await;
            });
        } else {
            warn!(
                mission_id = %request.mission_id,
                target_id = %request.target_id,
                stage = %request.stage,
                "Work request exhausted its retries"
            );
            tokio::spawn(async move {
                let _ = actor_tx
                    .send(MissionCommand::Exhausted {
                        target_id: request.target_id,
                        correlation_id: request.correlation_id,
                        stage: request.stage,
                    })
                    .await;
            });
        }
    }
}
