//! # Orchestration Core
//!
//! The single entry point for the rest of the system: creates missions,
//! routes submitted events to the owning mission actor, serves snapshots and
//! aggregate stats, and exposes the broadcast stream.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tracing::{info, warn};
use uuid::Uuid;

use super::dispatch::DispatchCoordinator;
use super::mission_actor::MissionHandle;
use super::types::{MissionSnapshot, SubmitOutcome, SystemStats};
use crate::broadcast::{BroadcastHub, Subscription};
use crate::config::AresConfig;
use crate::error::{AresError, Result};
use crate::events::RawEvent;
use crate::messaging::EventBus;
use crate::models::{AttemptOutcome, Mission, MissionRequest};

/// Top-level orchestrator
///
/// Owns the mission registry; everything mission-scoped is delegated to the
/// per-mission actor so the core itself holds no mission state.
pub struct OrchestrationCore {
    config: AresConfig,
    hub: Arc<BroadcastHub>,
    dispatch: Arc<DispatchCoordinator>,
    missions: DashMap<Uuid, MissionHandle>,
}

impl OrchestrationCore {
    /// Build the core over an event bus and start the stall ticker
    pub fn new(config: AresConfig, bus: Arc<dyn EventBus>) -> Arc<Self> {
        let hub = Arc::new(BroadcastHub::new(config.broadcast.clone()));
        let dispatch = DispatchCoordinator::new(config.dispatch.clone(), bus);
        let core = Arc::new(Self {
            config,
            hub,
            dispatch,
            missions: DashMap::new(),
        });
        core.start_stall_ticker();
        info!("🚀 Orchestration core initialized");
        core
    }

    /// Create a mission and start its actor
    pub fn create_mission(&self, request: MissionRequest) -> Result<Mission> {
        let scope = Self::validate_scope(request.scope)?;
        self.register(Mission::new(request.name, scope))
    }

    /// Create a mission under a caller-chosen id
    ///
    /// Recovery replays a recorded event log against a mission recreated with
    /// its original id, which keeps the derived target ids stable.
    pub fn create_mission_with_id(&self, id: Uuid, request: MissionRequest) -> Result<Mission> {
        let scope = Self::validate_scope(request.scope)?;
        let mut mission = Mission::new(request.name, scope);
        mission.id = id;
        self.register(mission)
    }

    fn register(&self, mission: Mission) -> Result<Mission> {
        if self.missions.contains_key(&mission.id) {
            return Err(AresError::ValidationError(format!(
                "mission {} already exists",
                mission.id
            )));
        }
        let handle = MissionHandle::spawn(
            mission.clone(),
            &self.config,
            Arc::clone(&self.hub),
            Arc::clone(&self.dispatch),
        );
        info!(
            mission_id = %mission.id,
            name = %mission.name,
            scope_size = mission.scope.len(),
            "🎯 Mission created"
        );
        self.missions.insert(mission.id, handle);
        Ok(mission)
    }

    fn validate_scope(scope: Vec<String>) -> Result<Vec<String>> {
        let scope: Vec<String> = scope
            .into_iter()
            .map(|address| address.trim().to_string())
            .filter(|address| !address.is_empty())
            .collect();
        if scope.is_empty() {
            return Err(AresError::ValidationError(
                "mission scope must contain at least one address".to_string(),
            ));
        }
        Ok(scope)
    }

    /// Submit a raw event, routing it to the owning mission actor
    ///
    /// An unknown mission id is a rejection, not an error: workers can race
    /// against mission teardown and the caller needs the outcome, not a 500.
    pub async fn submit(&self, raw: RawEvent) -> Result<SubmitOutcome> {
        let Some(handle) = self.missions.get(&raw.mission_id).map(|h| h.clone()) else {
            warn!(
                mission_id = %raw.mission_id,
                event_type = %raw.event_type,
                "Event for unknown mission rejected"
            );
            return Ok(SubmitOutcome::Rejected {
                reason: format!("unknown mission id {}", raw.mission_id),
            });
        };
        handle.submit(raw).await
    }

    /// Consistent snapshot of a mission and its targets
    pub async fn mission_snapshot(&self, mission_id: Uuid) -> Result<MissionSnapshot> {
        let handle = self.handle(mission_id)?;
        handle.snapshot().await
    }

    /// Abort a mission; returns false if it was already terminal
    pub async fn abort_mission(&self, mission_id: Uuid) -> Result<bool> {
        let handle = self.handle(mission_id)?;
        handle.abort().await
    }

    /// Attach a live subscriber to a mission's event stream
    pub fn subscribe(
        &self,
        mission_id: Uuid,
        from_sequence: Option<u64>,
    ) -> Result<Subscription> {
        if !self.missions.contains_key(&mission_id) {
            return Err(AresError::ValidationError(format!(
                "unknown mission id {mission_id}"
            )));
        }
        Ok(self.hub.subscribe(mission_id, from_sequence))
    }

    pub fn unsubscribe(&self, mission_id: Uuid, subscriber_id: Uuid) {
        self.hub.unsubscribe(mission_id, subscriber_id);
    }

    /// Aggregate counters across all missions
    pub async fn stats(&self) -> SystemStats {
        let handles: Vec<MissionHandle> =
            self.missions.iter().map(|entry| entry.value().clone()).collect();
        let mut stats = SystemStats {
            total_missions: handles.len(),
            ..Default::default()
        };
        for handle in handles {
            let Ok(snapshot) = handle.snapshot().await else {
                continue;
            };
            if snapshot.mission.status.is_active() {
                stats.active_missions += 1;
            }
            stats.hosts_discovered += snapshot.targets.len();
            for target in &snapshot.targets {
                stats.vulnerabilities_found += target.findings.len();
                stats.exploits_successful += target
                    .exploit_attempts
                    .iter()
                    .filter(|attempt| attempt.outcome == AttemptOutcome::Success)
                    .count();
            }
        }
        stats
    }

    pub fn mission_ids(&self) -> Vec<Uuid> {
        self.missions.iter().map(|entry| *entry.key()).collect()
    }

    fn handle(&self, mission_id: Uuid) -> Result<MissionHandle> {
        self.missions
            .get(&mission_id)
            .map(|entry| entry.clone())
            .ok_or_else(|| {
                AresError::ValidationError(format!("unknown mission id {mission_id}"))
            })
    }

    /// Periodically nudge every actor to scan for stalled targets
    fn start_stall_ticker(self: &Arc<Self>) {
        let core = Arc::downgrade(self);
        let tick: Duration = self.config.orchestrator.stall_tick();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let Some(core) = core.upgrade() else {
                    break;
                };
                for entry in core.missions.iter() {
                    entry.value().tick();
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventType;
    use crate::messaging::InMemoryEventBus;

    fn test_core() -> Arc<OrchestrationCore> {
        OrchestrationCore::new(AresConfig::default(), Arc::new(InMemoryEventBus::new()))
    }

    #[tokio::test]
    async fn test_create_mission_rejects_empty_scope() {
        let core = test_core();
        let result = core.create_mission(MissionRequest {
            name: "empty".to_string(),
            scope: vec!["  ".to_string()],
        });
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_submit_unknown_mission_is_rejected_not_error() {
        let core = test_core();
        let raw = RawEvent::new(EventType::SystemAlert, "agent-1", Uuid::new_v4());
        let outcome = core.submit(raw).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Rejected { .. }));
    }

    #[tokio::test]
    async fn test_snapshot_reflects_scope_targets() {
        let core = test_core();
        let mission = core
            .create_mission(MissionRequest {
                name: "sweep".to_string(),
                scope: vec!["10.0.0.1".to_string(), "10.0.0.2".to_string()],
            })
            .unwrap();
        let snapshot = core.mission_snapshot(mission.id).await.unwrap();
        assert_eq!(snapshot.targets.len(), 2);
        assert!(snapshot.last_sequence >= 1);
    }

    #[tokio::test]
    async fn test_stats_counts_missions() {
        let core = test_core();
        core.create_mission(MissionRequest {
            name: "one".to_string(),
            scope: vec!["10.0.0.1".to_string()],
        })
        .unwrap();
        let stats = core.stats().await;
        assert_eq!(stats.total_missions, 1);
        assert_eq!(stats.active_missions, 1);
        assert_eq!(stats.hosts_discovered, 1);
    }
}
