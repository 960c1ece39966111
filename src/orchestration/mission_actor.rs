//! # Mission Actor
//!
//! The serializing owner of one mission's state. All events, timer
//! callbacks, stall ticks, and snapshot reads for a mission flow through one
//! mpsc command channel into one task, so no two threads ever mutate the same
//! mission concurrently while distinct missions proceed fully in parallel.

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};
use uuid::Uuid;

use super::dispatch::DispatchCoordinator;
use super::store::{ApplyOutput, MissionState};
use super::types::{Decision, MissionSnapshot, SubmitOutcome, WorkRequest};
use crate::broadcast::BroadcastHub;
use crate::config::AresConfig;
use crate::error::{AresError, Result};
use crate::events::RawEvent;
use crate::models::Mission;
use crate::state_machine::WorkStage;

/// Commands processed by a mission actor, in arrival order
pub enum MissionCommand {
    /// Submit a raw event for validation, sequencing, and application
    Submit {
        raw: RawEvent,
        reply: oneshot::Sender<SubmitOutcome>,
    },
    /// Record a dispatch retry issued by the coordinator
    RecordDispatch { request: WorkRequest },
    /// A work request exhausted its retries
    Exhausted {
        target_id: Uuid,
        correlation_id: Uuid,
        stage: WorkStage,
    },
    /// Periodic stall-detection tick
    StallTick,
    /// Read a consistent snapshot of mission and targets
    Snapshot {
        reply: oneshot::Sender<MissionSnapshot>,
    },
    /// Abort the mission; replies false if it was already terminal
    Abort { reply: oneshot::Sender<bool> },
}

/// Handle to a running mission actor
#[derive(Clone)]
pub struct MissionHandle {
    pub mission_id: Uuid,
    tx: mpsc::Sender<MissionCommand>,
}

impl MissionHandle {
    /// Spawn the actor for a newly created mission
    pub fn spawn(
        mission: Mission,
        config: &AresConfig,
        hub: Arc<BroadcastHub>,
        dispatch: Arc<DispatchCoordinator>,
    ) -> Self {
        let mission_id = mission.id;
        let (tx, rx) = mpsc::channel(config.orchestrator.command_channel_capacity);
        let actor = MissionActor {
            state: MissionState::new(mission, config.orchestrator.dedup_set_capacity),
            hub,
            dispatch,
            self_tx: tx.clone(),
            quiescence_window: config.orchestrator.quiescence_window(),
            backlog_capacity: config.broadcast.backlog_capacity,
            backlog_pressure_reported: false,
        };
        tokio::spawn(actor.run(rx));
        Self { mission_id, tx }
    }

    pub async fn submit(&self, raw: RawEvent) -> Result<SubmitOutcome> {
        let (reply, response) = oneshot::channel();
        self.send(MissionCommand::Submit { raw, reply }).await?;
        response
            .await
            .map_err(|_| AresError::OrchestrationError("mission actor dropped reply".into()))
    }

    pub async fn snapshot(&self) -> Result<MissionSnapshot> {
        let (reply, response) = oneshot::channel();
        self.send(MissionCommand::Snapshot { reply }).await?;
        response
            .await
            .map_err(|_| AresError::OrchestrationError("mission actor dropped reply".into()))
    }

    pub async fn abort(&self) -> Result<bool> {
        let (reply, response) = oneshot::channel();
        self.send(MissionCommand::Abort { reply }).await?;
        response
            .await
            .map_err(|_| AresError::OrchestrationError("mission actor dropped reply".into()))
    }

    /// Fire-and-forget stall tick; a full command channel skips the tick
    /// rather than blocking the ticker
    pub fn tick(&self) {
        let _ = self.tx.try_send(MissionCommand::StallTick);
    }

    async fn send(&self, command: MissionCommand) -> Result<()> {
        self.tx.send(command).await.map_err(|_| {
            AresError::OrchestrationError(format!(
                "mission actor {} is no longer running",
                self.mission_id
            ))
        })
    }
}

struct MissionActor {
    state: MissionState,
    hub: Arc<BroadcastHub>,
    dispatch: Arc<DispatchCoordinator>,
    self_tx: mpsc::Sender<MissionCommand>,
    quiescence_window: std::time::Duration,
    backlog_capacity: usize,
    backlog_pressure_reported: bool,
}

impl MissionActor {
    async fn run(mut self, mut rx: mpsc::Receiver<MissionCommand>) {
        let mission_id = self.state.mission_id();
        info!(mission_id = %mission_id, "🎯 Mission actor started");

        let output = self.state.initialize();
        self.process_output(output);

        while let Some(command) = rx.recv().await {
            match command {
                MissionCommand::Submit { raw, reply } => {
                    let output = self.state.apply_raw(raw);
                    if let Some(correlation_id) = output.resolved_correlation {
                        self.dispatch.on_result(correlation_id);
                    }
                    let outcome = self.process_output(output);
                    if let Some(outcome) = outcome {
                        let _ = reply.send(outcome);
                    }
                }
                MissionCommand::RecordDispatch { request } => {
                    let output = self.state.record_dispatch(&request);
                    self.process_output(output);
                }
                MissionCommand::Exhausted {
                    target_id,
                    correlation_id,
                    stage,
                } => {
                    let output = self.state.record_exhausted(target_id, correlation_id, stage);
                    self.process_output(output);
                }
                MissionCommand::StallTick => {
                    let (output, stalled) = self.state.stall_scan(self.quiescence_window);
                    self.process_output(output);
                    for (target_id, stage) in stalled {
                        // An outstanding request already has timers driving it
                        if !self.dispatch.has_inflight_for_target(target_id) {
                            self.dispatch_work(target_id, stage);
                        }
                    }
                }
                MissionCommand::Snapshot { reply } => {
                    let _ = reply.send(self.state.snapshot());
                }
                MissionCommand::Abort { reply } => match self.state.abort() {
                    Some(output) => {
                        self.process_output(output);
                        let _ = reply.send(true);
                    }
                    None => {
                        let _ = reply.send(false);
                    }
                },
            }
        }
        debug!(mission_id = %mission_id, "Mission actor stopped");
    }

    /// Publish sealed events, execute derived decisions, and close out the
    /// mission when a mutation drove it terminal
    fn process_output(&mut self, output: ApplyOutput) -> Option<SubmitOutcome> {
        let ApplyOutput {
            outcome,
            events,
            decisions,
            mission_closed,
            resolved_correlation: _,
        } = output;

        for event in events {
            self.publish(event);
        }

        for decision in decisions {
            match decision {
                Decision::DispatchWork { target_id, stage } => {
                    self.dispatch_work(target_id, stage);
                }
            }
        }

        if let Some(status) = mission_closed {
            info!(
                mission_id = %self.state.mission_id(),
                status = %status,
                "Mission reached terminal status"
            );
            self.dispatch.cancel_mission(self.state.mission_id());
            self.hub.close_mission(self.state.mission_id(), status);
        }

        outcome
    }

    fn dispatch_work(&mut self, target_id: Uuid, stage: WorkStage) {
        let request = self.dispatch.dispatch(
            self.state.mission_id(),
            target_id,
            stage,
            self.self_tx.clone(),
        );
        let output = self.state.record_dispatch(&request);
        self.process_output(output);
    }

    fn publish(&mut self, event: crate::events::MissionEvent) {
        let outcome = self.hub.publish(event);
        if outcome.backlog_evicted && !self.backlog_pressure_reported {
            self.backlog_pressure_reported = true;
            let pressure = self.state.report_backlog_pressure(self.backlog_capacity);
            let _ = self.hub.publish(pressure);
        }
    }
}
