//! # Target Model
//!
//! A target is a single host or range being assessed within a mission. Its
//! stage only moves forward through the assessment lattice, except for the
//! explicit `Abandoned` terminal reachable from any stage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::state_machine::TargetStage;

/// A host or range within a mission's scope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: Uuid,
    pub mission_id: Uuid,
    /// Hostname, IP address, or CIDR range
    pub address: String,
    pub stage: TargetStage,
    /// Services discovered during reconnaissance ("host:port/proto" strings)
    pub services: BTreeSet<String>,
    pub findings: Vec<Finding>,
    /// Ordered history of exploit attempts against this target
    pub exploit_attempts: Vec<ExploitAttempt>,
    /// Sequence number of the last event that touched this target,
    /// used by stall detection
    pub last_activity_at: DateTime<Utc>,
}

/// A vulnerability finding reported by analysis workers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Finding {
    /// Vulnerability identifier (CVE id or scanner-specific key)
    pub identifier: String,
    pub severity: Severity,
    /// Sequence number of the event that produced this finding
    pub source_sequence: u64,
}

/// Finding severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

/// One exploit attempt and its outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExploitAttempt {
    /// Reference to the payload used (opaque to the orchestrator)
    pub payload_ref: String,
    pub outcome: AttemptOutcome,
    pub attempted_at: DateTime<Utc>,
}

/// Outcome of a single exploit attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Success,
    Failure,
}

impl Target {
    /// Create a new discovered target within a mission
    pub fn new(mission_id: Uuid, address: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            mission_id,
            address: address.into(),
            stage: TargetStage::Discovered,
            services: BTreeSet::new(),
            findings: Vec::new(),
            exploit_attempts: Vec::new(),
            last_activity_at: Utc::now(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.stage.is_terminal()
    }

    /// Record a finding, ignoring exact duplicates from replayed scans
    pub fn record_finding(&mut self, finding: Finding) {
        if !self
            .findings
            .iter()
            .any(|existing| existing.identifier == finding.identifier)
        {
            self.findings.push(finding);
        }
    }

    pub fn record_exploit_attempt(&mut self, attempt: ExploitAttempt) {
        self.exploit_attempts.push(attempt);
    }

    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.last_activity_at = at;
    }
}

/// Opaque payload extraction helpers for worker-reported fields
impl Finding {
    /// Build a finding from a worker payload, tolerating absent fields
    pub fn from_payload(payload: &Value, source_sequence: u64) -> Option<Self> {
        let identifier = payload.get("identifier").or_else(|| payload.get("cve_id"))?;
        let severity = payload
            .get("severity")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or(Severity::Medium);
        Some(Self {
            identifier: identifier.as_str()?.to_string(),
            severity,
            source_sequence,
        })
    }
}
