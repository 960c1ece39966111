//! # Event Envelopes
//!
//! Two envelope forms exist. `RawEvent` is what producers submit at ingress:
//! unsequenced, with an advisory timestamp (producer clocks are not trusted).
//! `MissionEvent` is the immutable, sequenced fact the orchestrator emits
//! after acceptance; its sequence number is assigned by the core and is
//! strictly increasing and gap-free within a mission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::types::EventType;

/// An event as submitted by a producer, prior to validation and sequencing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    pub event_type: EventType,
    /// Identity of the producing component ("recon-engine", "sandbox-executor")
    pub source: String,
    pub mission_id: Uuid,
    #[serde(default)]
    pub target_id: Option<Uuid>,
    /// Correlation id of the work request this event answers, when applicable
    #[serde(default)]
    pub correlation_id: Option<Uuid>,
    /// Opaque structured payload; the orchestrator only inspects envelope fields
    #[serde(default)]
    pub payload: Value,
    /// Advisory producer timestamp; never used for ordering
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl RawEvent {
    pub fn new(event_type: EventType, source: impl Into<String>, mission_id: Uuid) -> Self {
        Self {
            event_type,
            source: source.into(),
            mission_id,
            target_id: None,
            correlation_id: None,
            payload: Value::Null,
            timestamp: None,
        }
    }

    pub fn with_target(mut self, target_id: Uuid) -> Self {
        self.target_id = Some(target_id);
        self
    }

    pub fn with_correlation(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }
}

/// An accepted, sequenced mission event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionEvent {
    /// Monotonic per-mission sequence number, assigned on acceptance
    pub sequence: u64,
    pub event_type: EventType,
    pub source: String,
    pub mission_id: Uuid,
    pub target_id: Option<Uuid>,
    pub correlation_id: Option<Uuid>,
    pub payload: Value,
    /// Advisory producer timestamp carried through from the raw event
    pub producer_timestamp: Option<DateTime<Utc>>,
    /// When the orchestrator accepted and sequenced the event
    pub accepted_at: DateTime<Utc>,
}

impl MissionEvent {
    /// Seal a raw event with its assigned sequence number
    pub fn seal(raw: RawEvent, sequence: u64) -> Self {
        Self {
            sequence,
            event_type: raw.event_type,
            source: raw.source,
            mission_id: raw.mission_id,
            target_id: raw.target_id,
            correlation_id: raw.correlation_id,
            payload: raw.payload,
            producer_timestamp: raw.timestamp,
            accepted_at: Utc::now(),
        }
    }
}
