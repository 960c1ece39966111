//! # Orchestration Layer
//!
//! Mission lifecycle, event sequencing, and work dispatch. The
//! [`core::OrchestrationCore`] routes everything mission-scoped to a
//! per-mission actor ([`mission_actor`]) that serializes all mutations over
//! the pure state projection in [`store`], while [`dispatch`] tracks
//! in-flight work requests with deadlines and retries.

pub mod core;
pub mod dispatch;
pub mod mission_actor;
pub mod store;
pub mod types;

pub use core::OrchestrationCore;
pub use dispatch::DispatchCoordinator;
pub use mission_actor::{MissionCommand, MissionHandle};
pub use store::MissionState;
pub use types::{Decision, MissionSnapshot, SubmitOutcome, SystemStats, WorkRequest};
