//! # Event System Foundation
//!
//! Event type enumeration and envelopes shared by ingress, the orchestrator
//! core, and the broadcast hub.

pub mod envelope;
pub mod types;

pub use envelope::{MissionEvent, RawEvent};
pub use types::EventType;
