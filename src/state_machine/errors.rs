//! State machine error types

use thiserror::Error;

/// Errors raised by mission and target state machines
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateMachineError {
    #[error("Invalid transition from {from} on {event}")]
    InvalidTransition { from: String, event: String },

    #[error("Target stage {stage} is terminal, no further transitions allowed")]
    TerminalStage { stage: String },

    #[error("Mission status {status} is terminal, no further transitions allowed")]
    TerminalMission { status: String },

    #[error("Internal state machine error: {0}")]
    Internal(String),
}

pub type StateMachineResult<T> = std::result::Result<T, StateMachineError>;
