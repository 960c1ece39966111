use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum AresError {
    ValidationError(String),
    StateTransitionError(String),
    OrchestrationError(String),
    EventError(String),
    MessagingError(String),
    ConfigurationError(String),
    BroadcastError(String),
}

impl fmt::Display for AresError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AresError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            AresError::StateTransitionError(msg) => write!(f, "State transition error: {msg}"),
            AresError::OrchestrationError(msg) => write!(f, "Orchestration error: {msg}"),
            AresError::EventError(msg) => write!(f, "Event error: {msg}"),
            AresError::MessagingError(msg) => write!(f, "Messaging error: {msg}"),
            AresError::ConfigurationError(msg) => write!(f, "Configuration error: {msg}"),
            AresError::BroadcastError(msg) => write!(f, "Broadcast error: {msg}"),
        }
    }
}

impl std::error::Error for AresError {}

pub type Result<T> = std::result::Result<T, AresError>;
