//! Proptest strategies for generating worker event streams against a fixed
//! single-target mission.

use proptest::prelude::*;
use serde_json::json;
use uuid::Uuid;

use ares_core::events::{EventType, RawEvent};
use ares_core::orchestration::MissionState;

pub const SEED_ADDRESS: &str = "10.50.0.1";

pub fn mission_id() -> Uuid {
    Uuid::from_u128(0x5EED)
}

pub fn seed_target_id() -> Uuid {
    MissionState::target_id_for(mission_id(), SEED_ADDRESS)
}

/// An arbitrary worker event addressed at the seeded mission, covering stage
/// results, progress reports, and mission-level alerts
pub fn worker_event_strategy() -> impl Strategy<Value = RawEvent> {
    (0..7u8, any::<u128>(), 0..3usize).prop_map(|(kind, correlation, finding_count)| {
        let mission_id = mission_id();
        let target_id = seed_target_id();
        let event = match kind {
            0 => RawEvent::new(EventType::ReconCompleted, "recon-engine", mission_id)
                .with_target(target_id)
                .with_payload(json!({ "open_ports": [22] })),
            1 => {
                let findings: Vec<_> = (0..finding_count)
                    .map(|i| {
                        json!({
                            "identifier": format!("CVE-{correlation:x}-{i}"),
                            "severity": "high",
                        })
                    })
                    .collect();
                RawEvent::new(EventType::VulnScanCompleted, "vuln-scanner", mission_id)
                    .with_target(target_id)
                    .with_payload(json!({ "findings": findings }))
            }
            2 => RawEvent::new(EventType::ExploitSuccess, "exploit-agent", mission_id)
                .with_target(target_id)
                .with_payload(json!({ "payload_ref": "prop-exploit" })),
            3 => RawEvent::new(EventType::ExploitFailed, "exploit-agent", mission_id)
                .with_target(target_id)
                .with_payload(json!({ "payload_ref": "prop-exploit" })),
            4 => RawEvent::new(
                EventType::PersistenceEstablished,
                "persistence-agent",
                mission_id,
            )
            .with_target(target_id),
            5 => RawEvent::new(EventType::ReconServiceFound, "recon-engine", mission_id)
                .with_target(target_id)
                .with_payload(json!({ "service": "ssh" })),
            _ => RawEvent::new(EventType::SystemAlert, "watchdog", mission_id),
        };
        event.with_correlation(Uuid::from_u128(correlation))
    })
}
