use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Events that can trigger target stage transitions
///
/// These are derived from accepted mission events by the orchestrator; they
/// are the only inputs the target state machine understands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum TargetEvent {
    /// Reconnaissance scan finished for the target
    ScanComplete,
    /// Vulnerability analysis finished; carries the number of findings known
    /// for the target at that point
    AnalysisComplete { findings: usize },
    /// Exploit work was dispatched for the target
    ExploitDispatched,
    /// An exploit succeeded, with the worker-reported outcome payload
    ExploitSucceeded(Option<Value>),
    /// Persistence was established on the target
    PersistenceEstablished,
    /// Abandon the target, with a reason for the audit log
    Abandon(String),
}

impl TargetEvent {
    /// String representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ScanComplete => "scan_complete",
            Self::AnalysisComplete { .. } => "analysis_complete",
            Self::ExploitDispatched => "exploit_dispatched",
            Self::ExploitSucceeded(_) => "exploit_succeeded",
            Self::PersistenceEstablished => "persistence_established",
            Self::Abandon(_) => "abandon",
        }
    }

    /// Extract the abandon reason if this is an abandon event
    pub fn abandon_reason(&self) -> Option<&str> {
        match self {
            Self::Abandon(reason) => Some(reason),
            _ => None,
        }
    }

    /// Create an abandon event with the given reason
    pub fn abandon_with_reason(reason: impl Into<String>) -> Self {
        Self::Abandon(reason.into())
    }
}
