//! # Data Models
//!
//! In-memory authoritative models for missions and targets. These are owned
//! by the Mission State Store and mutated only through the orchestrator
//! core's serialized entry points.

pub mod mission;
pub mod target;

pub use mission::{Mission, MissionRequest};
pub use target::{AttemptOutcome, ExploitAttempt, Finding, Severity, Target};
