use serde::{Deserialize, Serialize};
use std::fmt;

/// Mission lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    /// Initial status when the mission is created
    Pending,
    /// At least one target is being worked
    Running,
    /// All targets terminal, with a mix of persisted and abandoned outcomes
    PartiallyComplete,
    /// All targets reached a terminal stage
    Complete,
    /// Mission processing hit an unrecoverable error
    Failed,
    /// Mission was aborted by operator request
    Aborted,
}

impl MissionStatus {
    /// Check if this is a terminal status (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::PartiallyComplete | Self::Complete | Self::Failed | Self::Aborted
        )
    }

    /// Check if this is an active status (mission is being processed)
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::PartiallyComplete => write!(f, "partially_complete"),
            Self::Complete => write!(f, "complete"),
            Self::Failed => write!(f, "failed"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

impl Default for MissionStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Target assessment stage within a mission
///
/// Stages form a forward-only lattice; the single exception is the terminal
/// `Abandoned` edge, reachable from any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStage {
    /// Target is known but not yet scanned
    Discovered,
    /// Reconnaissance completed, services enumerated
    Scanned,
    /// Vulnerability analysis completed
    Analyzed,
    /// Exploit work has been dispatched
    ExploitAttempted,
    /// An exploit succeeded against the target
    Compromised,
    /// Persistence was established on the target
    Persisted,
    /// Target failed out of the pipeline (terminal for the target only)
    Abandoned,
}

impl TargetStage {
    /// Check if this is a terminal stage for the target
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Persisted | Self::Abandoned)
    }

    /// Ordinal position in the forward lattice; `Abandoned` sits outside it
    pub fn ordinal(&self) -> Option<u8> {
        match self {
            Self::Discovered => Some(0),
            Self::Scanned => Some(1),
            Self::Analyzed => Some(2),
            Self::ExploitAttempted => Some(3),
            Self::Compromised => Some(4),
            Self::Persisted => Some(5),
            Self::Abandoned => None,
        }
    }

    /// Check whether moving to `next` respects the forward-only lattice
    pub fn can_advance_to(&self, next: TargetStage) -> bool {
        if next == Self::Abandoned {
            return *self != Self::Abandoned;
        }
        match (self.ordinal(), next.ordinal()) {
            (Some(from), Some(to)) => to > from,
            _ => false,
        }
    }
}

impl fmt::Display for TargetStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discovered => write!(f, "discovered"),
            Self::Scanned => write!(f, "scanned"),
            Self::Analyzed => write!(f, "analyzed"),
            Self::ExploitAttempted => write!(f, "exploit_attempted"),
            Self::Compromised => write!(f, "compromised"),
            Self::Persisted => write!(f, "persisted"),
            Self::Abandoned => write!(f, "abandoned"),
        }
    }
}

impl Default for TargetStage {
    fn default() -> Self {
        Self::Discovered
    }
}

/// Work stage requested from an external worker service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStage {
    /// Reconnaissance scan (recon-engine)
    Scan,
    /// Vulnerability analysis (cognitive agents)
    Analyze,
    /// Exploit synthesis and sandboxed execution
    Exploit,
    /// Persistence establishment
    Persist,
}

impl fmt::Display for WorkStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scan => write!(f, "scan"),
            Self::Analyze => write!(f, "analyze"),
            Self::Exploit => write!(f, "exploit"),
            Self::Persist => write!(f, "persist"),
        }
    }
}
