//! # Orchestration Types
//!
//! Shared types crossing component boundaries: submission outcomes, derived
//! decisions, work requests, and mission snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Mission, Target};
use crate::state_machine::WorkStage;

/// Result of submitting a raw event to the orchestrator core
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Event validated, sequenced, applied, and broadcast
    Accepted { sequence: u64 },
    /// Recognized correlation id already resolved; absorbed with no effect
    Duplicate,
    /// Structurally valid but no longer applicable (stale result for a
    /// terminal target, event for an aborted mission); absorbed, logged
    Discarded { reason: String },
    /// Malformed or unknown; rejected with no state change
    Rejected { reason: String },
}

impl SubmitOutcome {
    /// Whether the submission is acknowledged to the caller (202 vs 400)
    pub fn is_acknowledged(&self) -> bool {
        !matches!(self, Self::Rejected { .. })
    }
}

/// A derived decision the core hands to the dispatch coordinator
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Dispatch work of the given stage for a target
    DispatchWork { target_id: Uuid, stage: WorkStage },
}

/// A correlated, time-bounded unit of dispatched work awaiting a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkRequest {
    pub correlation_id: Uuid,
    pub mission_id: Uuid,
    pub target_id: Uuid,
    pub stage: WorkStage,
    pub issued_at: DateTime<Utc>,
    /// 0 for the initial dispatch, incremented per retry
    pub retry_count: u32,
    /// Deadline for this attempt, in milliseconds
    pub deadline_ms: u64,
}

/// Point-in-time view of a mission and all its targets
///
/// Served to late-joining subscribers for resynchronization and used for
/// recovery after a core restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionSnapshot {
    pub mission: Mission,
    pub targets: Vec<Target>,
    /// Highest sequence number assigned so far (0 if none)
    pub last_sequence: u64,
}

/// Aggregate counters for the dashboard stats surface
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemStats {
    pub total_missions: usize,
    pub active_missions: usize,
    pub hosts_discovered: usize,
    pub vulnerabilities_found: usize,
    pub exploits_successful: usize,
}
