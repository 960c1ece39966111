use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed enumeration of event types understood by the orchestrator
///
/// Wire names are dot-separated `component.happening` strings. Worker
/// services produce the `recon.*`, `vuln.*`, `exploit.*`, `persistence.*`
/// and `agent.*` families; the orchestrator synthesizes the `mission.*`,
/// `target.*`, `dispatch.*` and `resource.*` families for observability.
/// Unknown types fail deserialization at ingress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "recon.started")]
    ReconStarted,
    #[serde(rename = "recon.host_found")]
    ReconHostFound,
    #[serde(rename = "recon.service_found")]
    ReconServiceFound,
    #[serde(rename = "recon.completed")]
    ReconCompleted,

    #[serde(rename = "vuln.scan_started")]
    VulnScanStarted,
    #[serde(rename = "vuln.found")]
    VulnFound,
    #[serde(rename = "vuln.scan_completed")]
    VulnScanCompleted,

    #[serde(rename = "exploit.generation_started")]
    ExploitGenerationStarted,
    #[serde(rename = "exploit.generated")]
    ExploitGenerated,
    #[serde(rename = "exploit.tested")]
    ExploitTested,
    #[serde(rename = "exploit.success")]
    ExploitSuccess,
    #[serde(rename = "exploit.failed")]
    ExploitFailed,

    #[serde(rename = "persistence.established")]
    PersistenceEstablished,

    #[serde(rename = "agent.task_assigned")]
    AgentTaskAssigned,
    #[serde(rename = "agent.task_completed")]
    AgentTaskCompleted,
    #[serde(rename = "agent.error")]
    AgentError,

    #[serde(rename = "system.alert")]
    SystemAlert,

    // Orchestrator-synthesized event types
    #[serde(rename = "mission.created")]
    MissionCreated,
    #[serde(rename = "mission.completed")]
    MissionCompleted,
    #[serde(rename = "mission.aborted")]
    MissionAborted,
    #[serde(rename = "target.stage_changed")]
    TargetStageChanged,
    #[serde(rename = "target.stalled")]
    TargetStalled,
    #[serde(rename = "dispatch.issued")]
    DispatchIssued,
    #[serde(rename = "dispatch.retry")]
    DispatchRetry,
    #[serde(rename = "dispatch.exhausted")]
    DispatchExhausted,
    #[serde(rename = "resource.pressure")]
    ResourcePressure,
}

impl EventType {
    /// Wire name of the event type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReconStarted => "recon.started",
            Self::ReconHostFound => "recon.host_found",
            Self::ReconServiceFound => "recon.service_found",
            Self::ReconCompleted => "recon.completed",
            Self::VulnScanStarted => "vuln.scan_started",
            Self::VulnFound => "vuln.found",
            Self::VulnScanCompleted => "vuln.scan_completed",
            Self::ExploitGenerationStarted => "exploit.generation_started",
            Self::ExploitGenerated => "exploit.generated",
            Self::ExploitTested => "exploit.tested",
            Self::ExploitSuccess => "exploit.success",
            Self::ExploitFailed => "exploit.failed",
            Self::PersistenceEstablished => "persistence.established",
            Self::AgentTaskAssigned => "agent.task_assigned",
            Self::AgentTaskCompleted => "agent.task_completed",
            Self::AgentError => "agent.error",
            Self::SystemAlert => "system.alert",
            Self::MissionCreated => "mission.created",
            Self::MissionCompleted => "mission.completed",
            Self::MissionAborted => "mission.aborted",
            Self::TargetStageChanged => "target.stage_changed",
            Self::TargetStalled => "target.stalled",
            Self::DispatchIssued => "dispatch.issued",
            Self::DispatchRetry => "dispatch.retry",
            Self::DispatchExhausted => "dispatch.exhausted",
            Self::ResourcePressure => "resource.pressure",
        }
    }

    /// Whether this event type answers a dispatched work request and is
    /// expected to carry the request's correlation id
    pub fn is_worker_result(&self) -> bool {
        matches!(
            self,
            Self::ReconCompleted
                | Self::VulnScanCompleted
                | Self::ExploitSuccess
                | Self::ExploitFailed
                | Self::PersistenceEstablished
                | Self::AgentTaskCompleted
                | Self::AgentError
        )
    }

    /// Whether this event type is synthesized by the orchestrator itself
    pub fn is_synthetic(&self) -> bool {
        matches!(
            self,
            Self::MissionCreated
                | Self::MissionCompleted
                | Self::MissionAborted
                | Self::TargetStageChanged
                | Self::TargetStalled
                | Self::DispatchIssued
                | Self::DispatchRetry
                | Self::DispatchExhausted
                | Self::ResourcePressure
        )
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip() {
        for event_type in [
            EventType::ReconCompleted,
            EventType::VulnFound,
            EventType::ExploitSuccess,
            EventType::DispatchRetry,
            EventType::ResourcePressure,
        ] {
            let json = serde_json::to_string(&event_type).unwrap();
            assert_eq!(json, format!("\"{}\"", event_type.as_str()));
            let parsed: EventType = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, event_type);
        }
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result: Result<EventType, _> = serde_json::from_str("\"recon.imaginary\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_result_classification() {
        assert!(EventType::ReconCompleted.is_worker_result());
        assert!(EventType::ExploitFailed.is_worker_result());
        assert!(!EventType::VulnFound.is_worker_result());
        assert!(!EventType::DispatchIssued.is_worker_result());
    }
}
