// State machine module for mission orchestration
//
// Pure transition tables for mission status and target stage lifecycles.
// All transitions are applied by the per-mission actor; nothing in here
// performs I/O or holds shared state.

pub mod errors;
pub mod events;
pub mod states;
pub mod target_state_machine;

// Re-export main types for convenient access
pub use errors::{StateMachineError, StateMachineResult};
pub use events::TargetEvent;
pub use states::{MissionStatus, TargetStage, WorkStage};
pub use target_state_machine::TargetStateMachine;
