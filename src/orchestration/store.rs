//! # Mission State Store
//!
//! The authoritative, in-memory state for one mission: the mission record,
//! its targets, the sequence counter, and the bounded dedup set. Exactly one
//! mission actor owns each `MissionState`; nothing else reads or writes it.
//! All methods are synchronous and deterministic, which is what makes
//! replaying a recorded event log reproduce identical state.

use chrono::{Duration as ChronoDuration, Utc};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use super::types::{Decision, MissionSnapshot, SubmitOutcome, WorkRequest};
use crate::events::{EventType, MissionEvent, RawEvent};
use crate::models::{AttemptOutcome, ExploitAttempt, Finding, Mission, Target};
use crate::state_machine::{
    MissionStatus, TargetEvent, TargetStage, TargetStateMachine, WorkStage,
};

/// Source identity stamped on orchestrator-synthesized events
const ORCHESTRATOR_SOURCE: &str = "orchestrator";

/// Everything one state mutation produced
#[derive(Debug, Default)]
pub struct ApplyOutput {
    pub outcome: Option<SubmitOutcome>,
    /// Sealed events, in sequence order, to hand to the broadcast hub
    pub events: Vec<MissionEvent>,
    pub decisions: Vec<Decision>,
    /// Set when this mutation drove the mission to a terminal status
    pub mission_closed: Option<MissionStatus>,
    /// Correlation id to resolve at the dispatch coordinator, if any
    pub resolved_correlation: Option<Uuid>,
}

impl ApplyOutput {
    fn rejected(reason: impl Into<String>) -> Self {
        Self {
            outcome: Some(SubmitOutcome::Rejected {
                reason: reason.into(),
            }),
            ..Default::default()
        }
    }

    fn discarded(reason: impl Into<String>) -> Self {
        Self {
            outcome: Some(SubmitOutcome::Discarded {
                reason: reason.into(),
            }),
            ..Default::default()
        }
    }
}

/// Bounded set of recently resolved correlation ids
///
/// Sized to the outstanding-request count plus margin; eviction is by age.
/// This is the mechanism that turns at-least-once delivery from the bus into
/// effectively-once at the state machine boundary.
struct DedupSet {
    order: VecDeque<Uuid>,
    seen: HashSet<Uuid>,
    capacity: usize,
}

enum DedupInsert {
    Fresh,
    FreshWithEviction,
    Duplicate,
}

impl DedupSet {
    fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
            capacity,
        }
    }

    fn contains(&self, id: &Uuid) -> bool {
        self.seen.contains(id)
    }

    fn insert(&mut self, id: Uuid) -> DedupInsert {
        if self.seen.contains(&id) {
            return DedupInsert::Duplicate;
        }
        let mut evicted = false;
        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
                evicted = true;
            }
        }
        self.order.push_back(id);
        self.seen.insert(id);
        if evicted {
            DedupInsert::FreshWithEviction
        } else {
            DedupInsert::Fresh
        }
    }
}

/// Authoritative state for one mission
pub struct MissionState {
    mission: Mission,
    /// Keyed by deterministic target id; BTreeMap keeps iteration stable
    targets: BTreeMap<Uuid, Target>,
    next_sequence: u64,
    dedup: DedupSet,
    dedup_pressure_reported: bool,
}

impl MissionState {
    pub fn new(mission: Mission, dedup_capacity: usize) -> Self {
        Self {
            mission,
            targets: BTreeMap::new(),
            next_sequence: 1,
            dedup: DedupSet::new(dedup_capacity),
            dedup_pressure_reported: false,
        }
    }

    /// Deterministic target id derived from the mission id and address, so
    /// that replaying the same event log reproduces the same target identities
    pub fn target_id_for(mission_id: Uuid, address: &str) -> Uuid {
        Uuid::new_v5(&mission_id, address.as_bytes())
    }

    pub fn mission_id(&self) -> Uuid {
        self.mission.id
    }

    pub fn is_terminal(&self) -> bool {
        self.mission.is_terminal()
    }

    /// Start the mission: move to Running, materialize scope targets, and
    /// decide the initial reconnaissance dispatches
    pub fn initialize(&mut self) -> ApplyOutput {
        let mut output = ApplyOutput::default();
        self.mission.status = MissionStatus::Running;
        self.mission.started_at = Some(Utc::now());

        for address in self.mission.scope.clone() {
            let target_id = self.add_target(&address);
            output.decisions.push(Decision::DispatchWork {
                target_id,
                stage: WorkStage::Scan,
            });
        }

        let target_ids: Vec<String> = self.targets.keys().map(Uuid::to_string).collect();
        output.events.push(self.synthesize(
            EventType::MissionCreated,
            None,
            json!({
                "name": self.mission.name,
                "scope": self.mission.scope,
                "targets": target_ids,
            }),
        ));
        output
    }

    /// Apply a validated-shape raw event from ingress
    pub fn apply_raw(&mut self, raw: RawEvent) -> ApplyOutput {
        if raw.event_type.is_synthetic() {
            return ApplyOutput::rejected(format!(
                "event type {} is reserved for the orchestrator",
                raw.event_type
            ));
        }
        if self.mission.is_terminal() {
            return ApplyOutput::discarded(format!(
                "mission is {}, event absorbed",
                self.mission.status
            ));
        }

        // Effectively-once: a correlation id we already resolved is absorbed
        // before any state is touched
        if let Some(correlation_id) = raw.correlation_id {
            if self.dedup.contains(&correlation_id) {
                debug!(
                    mission_id = %self.mission.id,
                    correlation_id = %correlation_id,
                    event_type = %raw.event_type,
                    "Duplicate result absorbed"
                );
                return ApplyOutput {
                    outcome: Some(SubmitOutcome::Duplicate),
                    ..Default::default()
                };
            }
        }

        // Resolve the target reference
        let target_id = match (raw.target_id, Self::requires_target(raw.event_type)) {
            (Some(id), _) => {
                if !self.targets.contains_key(&id) {
                    return ApplyOutput::rejected(format!("unknown target id {id}"));
                }
                Some(id)
            }
            (None, true) => {
                return ApplyOutput::rejected(format!(
                    "event type {} requires a target id",
                    raw.event_type
                ));
            }
            (None, false) => None,
        };

        // Validate the stage transition (if this event drives one) before
        // mutating anything, so discarded events leave no trace
        let sequence = self.next_sequence;
        let pending_findings = self.parse_payload_findings(target_id, &raw.payload, sequence);
        let stage_event = self.stage_event_for(&raw, target_id, pending_findings.len());

        let mut transition = None;
        if let (Some(id), Some(event)) = (target_id, &stage_event) {
            let current = self.targets[&id].stage;
            match TargetStateMachine::determine_target_stage(current, event) {
                Ok(next) => transition = Some((id, current, next)),
                Err(err) => {
                    warn!(
                        mission_id = %self.mission.id,
                        target_id = %id,
                        event_type = %raw.event_type,
                        error = %err,
                        "Stale or out-of-order result absorbed"
                    );
                    return ApplyOutput::discarded(err.to_string());
                }
            }
        }

        // Commit: seal the event, record side effects, advance the stage
        let mut output = ApplyOutput::default();
        output.resolved_correlation = raw.correlation_id;

        if let Some(correlation_id) = raw.correlation_id {
            if matches!(
                self.dedup.insert(correlation_id),
                DedupInsert::FreshWithEviction
            ) && !self.dedup_pressure_reported
            {
                self.dedup_pressure_reported = true;
                output.events.push(self.synthesize(
                    EventType::ResourcePressure,
                    None,
                    json!({
                        "resource": "dedup_set",
                        "capacity": self.dedup.capacity,
                        "action": "oldest entries evicted",
                    }),
                ));
            }
        }

        let sealed = self.seal(raw.clone());
        output.outcome = Some(SubmitOutcome::Accepted {
            sequence: sealed.sequence,
        });
        output.events.push(sealed);

        // Reconnaissance can grow the target set within scope; a fresh
        // address enters the pipeline at Discovered with a scan dispatch
        if raw.event_type == EventType::ReconHostFound {
            if let Some(address) = raw
                .payload
                .get("address")
                .or_else(|| raw.payload.get("ip"))
                .and_then(Value::as_str)
            {
                let known = self
                    .targets
                    .contains_key(&Self::target_id_for(self.mission.id, address));
                let new_target_id = self.add_target(address);
                if !known {
                    output.decisions.push(Decision::DispatchWork {
                        target_id: new_target_id,
                        stage: WorkStage::Scan,
                    });
                }
            }
        }

        self.record_side_effects(&raw, target_id, pending_findings);

        if let Some((id, from, to)) = transition {
            self.advance_stage(id, from, to, &mut output);
        }

        self.check_completion(&mut output);
        output
    }

    /// Record an issued or retried dispatch as an observable event
    pub fn record_dispatch(&mut self, request: &WorkRequest) -> ApplyOutput {
        let mut output = ApplyOutput::default();
        let Some(target) = self.targets.get(&request.target_id) else {
            return output;
        };
        if self.mission.is_terminal() || target.is_terminal() {
            return output;
        }

        let event_type = if request.retry_count == 0 {
            EventType::DispatchIssued
        } else {
            EventType::DispatchRetry
        };
        output.events.push(self.synthesize(
            event_type,
            Some(request.target_id),
            json!({
                "correlation_id": request.correlation_id,
                "stage": request.stage,
                "retry_count": request.retry_count,
                "deadline_ms": request.deadline_ms,
            }),
        ));

        // Issuing exploit work is itself the lattice edge into ExploitAttempted
        if request.stage == WorkStage::Exploit {
            let current = self.targets[&request.target_id].stage;
            if current == TargetStage::Analyzed {
                self.advance_stage(
                    request.target_id,
                    current,
                    TargetStage::ExploitAttempted,
                    &mut output,
                );
            }
        }
        output
    }

    /// A work request ran out of retries: abandon the target
    pub fn record_exhausted(
        &mut self,
        target_id: Uuid,
        correlation_id: Uuid,
        stage: WorkStage,
    ) -> ApplyOutput {
        let mut output = ApplyOutput::default();
        let Some(target) = self.targets.get(&target_id) else {
            return output;
        };
        if self.mission.is_terminal() || target.is_terminal() {
            return output;
        }

        output.events.push(self.synthesize(
            EventType::DispatchExhausted,
            Some(target_id),
            json!({
                "correlation_id": correlation_id,
                "stage": stage,
                "reason": "deadline exhausted after max retries",
            }),
        ));

        let current = self.targets[&target_id].stage;
        self.advance_stage(target_id, current, TargetStage::Abandoned, &mut output);
        self.check_completion(&mut output);
        output
    }

    /// Fixed-tick quiescence scan; returns stalled targets with the work
    /// stage that should be re-driven for each
    pub fn stall_scan(&mut self, window: Duration) -> (ApplyOutput, Vec<(Uuid, WorkStage)>) {
        let mut output = ApplyOutput::default();
        let mut stalled = Vec::new();
        if self.mission.is_terminal() {
            return (output, stalled);
        }

        let window = ChronoDuration::from_std(window).unwrap_or(ChronoDuration::MAX);
        let now = Utc::now();
        let quiescent: Vec<Uuid> = self
            .targets
            .values()
            .filter(|target| !target.is_terminal() && now - target.last_activity_at > window)
            .map(|target| target.id)
            .collect();

        for target_id in quiescent {
            let stage = self.targets[&target_id].stage;
            let work = Self::work_stage_for(stage);
            output.events.push(self.synthesize(
                EventType::TargetStalled,
                Some(target_id),
                json!({
                    "stage": stage,
                    "quiescent_for_ms": window.num_milliseconds(),
                }),
            ));
            // Reset the clock so one stall is reported once per window
            if let Some(target) = self.targets.get_mut(&target_id) {
                target.touch(now);
            }
            stalled.push((target_id, work));
        }
        (output, stalled)
    }

    /// Abort the mission; returns None if already terminal
    pub fn abort(&mut self) -> Option<ApplyOutput> {
        if self.mission.is_terminal() {
            return None;
        }
        let mut output = ApplyOutput::default();
        self.mission.status = MissionStatus::Aborted;
        self.mission.completed_at = Some(Utc::now());
        output.events.push(self.synthesize(
            EventType::MissionAborted,
            None,
            json!({ "reason": "operator abort" }),
        ));
        output.mission_closed = Some(MissionStatus::Aborted);
        Some(output)
    }

    /// Sequenced warning event for broadcast backlog eviction; the actor
    /// emits this once per mission when the hub first evicts retained history
    pub fn report_backlog_pressure(&mut self, capacity: usize) -> MissionEvent {
        self.synthesize(
            EventType::ResourcePressure,
            None,
            json!({
                "resource": "broadcast_backlog",
                "capacity": capacity,
                "action": "oldest entries evicted",
            }),
        )
    }

    pub fn snapshot(&self) -> MissionSnapshot {
        MissionSnapshot {
            mission: self.mission.clone(),
            targets: self.targets.values().cloned().collect(),
            last_sequence: self.next_sequence - 1,
        }
    }

    // ---- internal helpers ----

    fn seal(&mut self, raw: RawEvent) -> MissionEvent {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        MissionEvent::seal(raw, sequence)
    }

    fn synthesize(
        &mut self,
        event_type: EventType,
        target_id: Option<Uuid>,
        payload: Value,
    ) -> MissionEvent {
        let mut raw = RawEvent::new(event_type, ORCHESTRATOR_SOURCE, self.mission.id)
            .with_payload(payload);
        raw.target_id = target_id;
        self.seal(raw)
    }

    fn add_target(&mut self, address: &str) -> Uuid {
        let target_id = Self::target_id_for(self.mission.id, address);
        self.targets.entry(target_id).or_insert_with(|| {
            let mut target = Target::new(self.mission.id, address);
            target.id = target_id;
            target
        });
        target_id
    }

    /// Which raw event types are meaningless without a target reference
    fn requires_target(event_type: EventType) -> bool {
        matches!(
            event_type,
            EventType::ReconServiceFound
                | EventType::ReconCompleted
                | EventType::VulnFound
                | EventType::VulnScanCompleted
                | EventType::ExploitSuccess
                | EventType::ExploitFailed
                | EventType::PersistenceEstablished
        )
    }

    /// Findings carried in a `findings` payload array, already filtered of
    /// identifiers the target has recorded
    fn parse_payload_findings(
        &self,
        target_id: Option<Uuid>,
        payload: &Value,
        sequence: u64,
    ) -> Vec<Finding> {
        let Some(target_id) = target_id else {
            return Vec::new();
        };
        let Some(target) = self.targets.get(&target_id) else {
            return Vec::new();
        };
        let mut findings = Vec::new();
        if let Some(items) = payload.get("findings").and_then(Value::as_array) {
            for item in items {
                if let Some(finding) = Finding::from_payload(item, sequence) {
                    let known = target
                        .findings
                        .iter()
                        .chain(findings.iter())
                        .any(|f: &Finding| f.identifier == finding.identifier);
                    if !known {
                        findings.push(finding);
                    }
                }
            }
        }
        findings
    }

    /// Derive the target state machine input for a raw event, if it has one
    fn stage_event_for(
        &self,
        raw: &RawEvent,
        target_id: Option<Uuid>,
        new_findings: usize,
    ) -> Option<TargetEvent> {
        match raw.event_type {
            EventType::ReconCompleted => Some(TargetEvent::ScanComplete),
            EventType::VulnScanCompleted => {
                let existing = target_id
                    .and_then(|id| self.targets.get(&id))
                    .map_or(0, |target| target.findings.len());
                Some(TargetEvent::AnalysisComplete {
                    findings: existing + new_findings,
                })
            }
            EventType::ExploitSuccess => {
                Some(TargetEvent::ExploitSucceeded(Some(raw.payload.clone())))
            }
            EventType::ExploitFailed => {
                Some(TargetEvent::abandon_with_reason("exploit attempt failed"))
            }
            EventType::PersistenceEstablished => Some(TargetEvent::PersistenceEstablished),
            EventType::AgentError if target_id.is_some() => {
                Some(TargetEvent::abandon_with_reason("agent reported error"))
            }
            _ => None,
        }
    }

    /// Accumulate non-stage side effects of an accepted event
    fn record_side_effects(
        &mut self,
        raw: &RawEvent,
        target_id: Option<Uuid>,
        pending_findings: Vec<Finding>,
    ) {
        let now = Utc::now();

        let Some(target_id) = target_id else { return };
        let Some(target) = self.targets.get_mut(&target_id) else {
            return;
        };
        target.touch(now);

        match raw.event_type {
            EventType::ReconServiceFound => {
                if let Some(service) = raw.payload.get("service").and_then(Value::as_str) {
                    target.services.insert(service.to_string());
                }
            }
            EventType::VulnFound => {
                if let Some(finding) = Finding::from_payload(&raw.payload, self.next_sequence - 1) {
                    target.record_finding(finding);
                }
            }
            EventType::VulnScanCompleted => {
                for finding in pending_findings {
                    target.record_finding(finding);
                }
            }
            EventType::ExploitSuccess | EventType::ExploitFailed => {
                let payload_ref = raw
                    .payload
                    .get("payload_ref")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string();
                let outcome = if raw.event_type == EventType::ExploitSuccess {
                    AttemptOutcome::Success
                } else {
                    AttemptOutcome::Failure
                };
                target.record_exploit_attempt(ExploitAttempt {
                    payload_ref,
                    outcome,
                    attempted_at: now,
                });
            }
            _ => {}
        }
    }

    /// Apply a stage transition, emit its observability event, and derive the
    /// follow-on dispatch decision
    fn advance_stage(
        &mut self,
        target_id: Uuid,
        from: TargetStage,
        to: TargetStage,
        output: &mut ApplyOutput,
    ) {
        let event = self.synthesize(
            EventType::TargetStageChanged,
            Some(target_id),
            json!({ "from": from, "to": to }),
        );
        output.events.push(event);

        if let Some(target) = self.targets.get_mut(&target_id) {
            target.stage = to;
            target.touch(Utc::now());
        }

        let next_work = match to {
            TargetStage::Scanned => Some(WorkStage::Analyze),
            TargetStage::Analyzed => Some(WorkStage::Exploit),
            TargetStage::Compromised => Some(WorkStage::Persist),
            _ => None,
        };
        if let Some(stage) = next_work {
            output.decisions.push(Decision::DispatchWork { target_id, stage });
        }
    }

    /// The work stage that drives a target forward from its current stage
    fn work_stage_for(stage: TargetStage) -> WorkStage {
        match stage {
            TargetStage::Discovered => WorkStage::Scan,
            TargetStage::Scanned => WorkStage::Analyze,
            TargetStage::Analyzed | TargetStage::ExploitAttempted => WorkStage::Exploit,
            // Terminal stages never reach here; Persist is the only remaining work
            _ => WorkStage::Persist,
        }
    }

    /// Mission completion: every target terminal. Mixed persisted/abandoned
    /// outcomes yield PartiallyComplete, uniform outcomes yield Complete.
    fn check_completion(&mut self, output: &mut ApplyOutput) {
        if self.mission.is_terminal() || self.targets.is_empty() {
            return;
        }
        if !self.targets.values().all(Target::is_terminal) {
            return;
        }

        let persisted = self
            .targets
            .values()
            .filter(|t| t.stage == TargetStage::Persisted)
            .count();
        let abandoned = self.targets.len() - persisted;
        let status = if persisted > 0 && abandoned > 0 {
            MissionStatus::PartiallyComplete
        } else {
            MissionStatus::Complete
        };

        self.mission.status = status;
        self.mission.completed_at = Some(Utc::now());
        let event = self.synthesize(
            EventType::MissionCompleted,
            None,
            json!({
                "status": status,
                "targets_persisted": persisted,
                "targets_abandoned": abandoned,
            }),
        );
        output.events.push(event);
        output.mission_closed = Some(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_state() -> (MissionState, Uuid) {
        let mission = Mission::new("test-mission", vec!["10.0.0.5".to_string()]);
        let mission_id = mission.id;
        let mut state = MissionState::new(mission, 8);
        state.initialize();
        let target_id = MissionState::target_id_for(mission_id, "10.0.0.5");
        (state, target_id)
    }

    fn result_event(
        state: &MissionState,
        event_type: EventType,
        target_id: Uuid,
        payload: Value,
    ) -> RawEvent {
        RawEvent::new(event_type, "worker", state.mission_id())
            .with_target(target_id)
            .with_correlation(Uuid::new_v4())
            .with_payload(payload)
    }

    #[test]
    fn test_initialize_emits_created_and_scan_decisions() {
        let (state, target_id) = {
            let mission = Mission::new("m", vec!["10.0.0.5".to_string()]);
            let mission_id = mission.id;
            let mut state = MissionState::new(mission, 8);
            let output = state.initialize();
            assert_eq!(output.events.len(), 1);
            assert_eq!(output.events[0].sequence, 1);
            assert_eq!(output.events[0].event_type, EventType::MissionCreated);
            assert_eq!(
                output.decisions,
                vec![Decision::DispatchWork {
                    target_id: MissionState::target_id_for(mission_id, "10.0.0.5"),
                    stage: WorkStage::Scan,
                }]
            );
            (state, MissionState::target_id_for(mission_id, "10.0.0.5"))
        };
        let snapshot = state.snapshot();
        assert_eq!(snapshot.mission.status, MissionStatus::Running);
        assert_eq!(snapshot.targets.len(), 1);
        assert_eq!(snapshot.targets[0].id, target_id);
    }

    #[test]
    fn test_sequences_are_gap_free_across_mutations() {
        let (mut state, target_id) = running_state();
        let mut sequences = vec![1u64];

        let output = state.apply_raw(result_event(
            &state,
            EventType::ReconCompleted,
            target_id,
            json!({}),
        ));
        sequences.extend(output.events.iter().map(|e| e.sequence));

        let output = state.apply_raw(result_event(
            &state,
            EventType::VulnScanCompleted,
            target_id,
            json!({"findings": [{"identifier": "CVE-1", "severity": "high"}]}),
        ));
        sequences.extend(output.events.iter().map(|e| e.sequence));

        let expected: Vec<u64> = (1..=sequences.len() as u64).collect();
        assert_eq!(sequences, expected);
    }

    #[test]
    fn test_duplicate_correlation_id_absorbed() {
        let (mut state, target_id) = running_state();
        let raw = result_event(&state, EventType::ReconCompleted, target_id, json!({}));

        let first = state.apply_raw(raw.clone());
        assert!(matches!(
            first.outcome,
            Some(SubmitOutcome::Accepted { .. })
        ));
        assert!(!first.events.is_empty());

        let second = state.apply_raw(raw);
        assert_eq!(second.outcome, Some(SubmitOutcome::Duplicate));
        assert!(second.events.is_empty());
        assert!(second.decisions.is_empty());
    }

    #[test]
    fn test_zero_findings_analysis_abandons_target() {
        let (mut state, target_id) = running_state();
        state.apply_raw(result_event(
            &state,
            EventType::ReconCompleted,
            target_id,
            json!({}),
        ));
        let output = state.apply_raw(result_event(
            &state,
            EventType::VulnScanCompleted,
            target_id,
            json!({"findings": []}),
        ));

        let snapshot = state.snapshot();
        assert_eq!(snapshot.targets[0].stage, TargetStage::Abandoned);
        // Single target abandoned means every target is terminal
        assert_eq!(output.mission_closed, Some(MissionStatus::Complete));
        assert_eq!(snapshot.mission.status, MissionStatus::Complete);
        // No exploit was ever dispatched
        assert!(!output
            .decisions
            .iter()
            .any(|d| matches!(d, Decision::DispatchWork { stage: WorkStage::Exploit, .. })));
    }

    #[test]
    fn test_full_lifecycle_to_persisted() {
        let (mut state, target_id) = running_state();
        state.apply_raw(result_event(
            &state,
            EventType::ReconCompleted,
            target_id,
            json!({}),
        ));
        let analysis = state.apply_raw(result_event(
            &state,
            EventType::VulnScanCompleted,
            target_id,
            json!({"findings": [{"identifier": "CVE-9", "severity": "critical"}]}),
        ));
        assert!(analysis
            .decisions
            .contains(&Decision::DispatchWork { target_id, stage: WorkStage::Exploit }));

        // The exploit dispatch itself advances the stage
        let request = WorkRequest {
            correlation_id: Uuid::new_v4(),
            mission_id: state.mission_id(),
            target_id,
            stage: WorkStage::Exploit,
            issued_at: Utc::now(),
            retry_count: 0,
            deadline_ms: 2_000,
        };
        state.record_dispatch(&request);
        assert_eq!(
            state.snapshot().targets[0].stage,
            TargetStage::ExploitAttempted
        );

        state.apply_raw(result_event(
            &state,
            EventType::ExploitSuccess,
            target_id,
            json!({"payload_ref": "exploit-42"}),
        ));
        assert_eq!(state.snapshot().targets[0].stage, TargetStage::Compromised);

        let output = state.apply_raw(result_event(
            &state,
            EventType::PersistenceEstablished,
            target_id,
            json!({}),
        ));
        let snapshot = state.snapshot();
        assert_eq!(snapshot.targets[0].stage, TargetStage::Persisted);
        assert_eq!(snapshot.mission.status, MissionStatus::Complete);
        assert_eq!(output.mission_closed, Some(MissionStatus::Complete));
        assert_eq!(snapshot.targets[0].exploit_attempts.len(), 1);
        assert_eq!(
            snapshot.targets[0].exploit_attempts[0].outcome,
            AttemptOutcome::Success
        );
    }

    #[test]
    fn test_exhausted_dispatch_abandons_target_and_completes_mission() {
        let (mut state, target_id) = running_state();
        let output = state.record_exhausted(target_id, Uuid::new_v4(), WorkStage::Scan);
        assert_eq!(output.mission_closed, Some(MissionStatus::Complete));
        assert_eq!(state.snapshot().targets[0].stage, TargetStage::Abandoned);
        assert!(output
            .events
            .iter()
            .any(|e| e.event_type == EventType::DispatchExhausted));
    }

    #[test]
    fn test_stale_result_for_terminal_target_discarded() {
        let (mut state, target_id) = running_state();
        state.record_exhausted(target_id, Uuid::new_v4(), WorkStage::Scan);

        let output = state.apply_raw(result_event(
            &state,
            EventType::ReconCompleted,
            target_id,
            json!({}),
        ));
        assert!(matches!(
            output.outcome,
            Some(SubmitOutcome::Discarded { .. })
        ));
        assert!(output.events.is_empty());
    }

    #[test]
    fn test_unknown_target_rejected() {
        let (mut state, _) = running_state();
        let raw = RawEvent::new(EventType::ReconCompleted, "worker", state.mission_id())
            .with_target(Uuid::new_v4());
        let output = state.apply_raw(raw);
        assert!(matches!(
            output.outcome,
            Some(SubmitOutcome::Rejected { .. })
        ));
    }

    #[test]
    fn test_synthetic_types_rejected_at_ingress() {
        let (mut state, _) = running_state();
        let raw = RawEvent::new(EventType::DispatchIssued, "imposter", state.mission_id());
        let output = state.apply_raw(raw);
        assert!(matches!(
            output.outcome,
            Some(SubmitOutcome::Rejected { .. })
        ));
    }

    #[test]
    fn test_recon_host_found_grows_target_set() {
        let (mut state, _) = running_state();
        let raw = RawEvent::new(EventType::ReconHostFound, "recon-engine", state.mission_id())
            .with_payload(json!({"address": "10.0.0.9"}));
        let output = state.apply_raw(raw);
        assert!(matches!(
            output.outcome,
            Some(SubmitOutcome::Accepted { .. })
        ));
        assert_eq!(state.snapshot().targets.len(), 2);
    }

    #[test]
    fn test_mixed_outcomes_partially_complete() {
        let mission = Mission::new(
            "m",
            vec!["10.0.0.5".to_string(), "10.0.0.6".to_string()],
        );
        let mission_id = mission.id;
        let mut state = MissionState::new(mission, 8);
        state.initialize();
        let first = MissionState::target_id_for(mission_id, "10.0.0.5");
        let second = MissionState::target_id_for(mission_id, "10.0.0.6");

        // First target: full path to Persisted
        for (event_type, payload) in [
            (EventType::ReconCompleted, json!({})),
            (
                EventType::VulnScanCompleted,
                json!({"findings": [{"identifier": "CVE-1"}]}),
            ),
        ] {
            state.apply_raw(result_event(&state, event_type, first, payload));
        }
        state.record_dispatch(&WorkRequest {
            correlation_id: Uuid::new_v4(),
            mission_id,
            target_id: first,
            stage: WorkStage::Exploit,
            issued_at: Utc::now(),
            retry_count: 0,
            deadline_ms: 2_000,
        });
        state.apply_raw(result_event(&state, EventType::ExploitSuccess, first, json!({})));
        state.apply_raw(result_event(
            &state,
            EventType::PersistenceEstablished,
            first,
            json!({}),
        ));
        assert_eq!(state.snapshot().mission.status, MissionStatus::Running);

        // Second target: abandoned
        let output = state.record_exhausted(second, Uuid::new_v4(), WorkStage::Scan);
        assert_eq!(output.mission_closed, Some(MissionStatus::PartiallyComplete));
    }

    #[test]
    fn test_dedup_eviction_reports_pressure_once() {
        let mission = Mission::new("m", vec!["10.0.0.5".to_string()]);
        let mut state = MissionState::new(mission, 2);
        state.initialize();

        let mut pressure_events = 0;
        for _ in 0..5 {
            let raw = RawEvent::new(EventType::AgentTaskCompleted, "agent", state.mission_id())
                .with_correlation(Uuid::new_v4());
            let output = state.apply_raw(raw);
            pressure_events += output
                .events
                .iter()
                .filter(|e| e.event_type == EventType::ResourcePressure)
                .count();
        }
        assert_eq!(pressure_events, 1);
    }
}
