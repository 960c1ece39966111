//! # Mission Model
//!
//! A mission is a bounded unit of assessment work over a target scope,
//! tracked from creation to a terminal status. Missions are owned exclusively
//! by the orchestrator core; nothing outside the per-mission actor mutates one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state_machine::MissionStatus;

/// A complete assessment mission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    pub id: Uuid,
    /// Human-readable mission name
    pub name: String,
    /// Hostnames / IP ranges in scope; never empty
    pub scope: Vec<String>,
    pub status: MissionStatus,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Mission {
    /// Create a new pending mission over the given scope
    pub fn new(name: impl Into<String>, scope: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            scope,
            status: MissionStatus::Pending,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Request body for mission creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionRequest {
    pub name: String,
    /// Hostnames / IP ranges to assess; an empty scope is rejected
    pub scope: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_mission_starts_pending() {
        let mission = Mission::new("perimeter-sweep", vec!["10.0.0.0/24".to_string()]);
        assert_eq!(mission.status, MissionStatus::Pending);
        assert!(mission.started_at.is_none());
        assert!(!mission.is_terminal());
    }
}
