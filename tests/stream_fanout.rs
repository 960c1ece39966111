//! Broadcast fan-out behavior: slow subscribers are disconnected without
//! affecting healthy ones, late joiners past the retained backlog get an
//! explicit gap frame, and replaying the same event log reproduces the same
//! projection.

mod common;

use common::harness;

use serde_json::json;
use uuid::Uuid;

use ares_core::broadcast::StreamFrame;
use ares_core::config::AresConfig;
use ares_core::events::{EventType, RawEvent};
use ares_core::models::MissionRequest;
use ares_core::orchestration::{MissionSnapshot, MissionState};
use ares_core::state_machine::{MissionStatus, TargetStage};

fn request(scope: &[&str]) -> MissionRequest {
    MissionRequest {
        name: "fanout".to_string(),
        scope: scope.iter().map(|s| s.to_string()).collect(),
    }
}

fn alert(mission_id: Uuid, index: usize) -> RawEvent {
    RawEvent::new(EventType::SystemAlert, "watchdog", mission_id)
        .with_payload(json!({ "index": index }))
}

#[tokio::test]
async fn test_slow_subscriber_dropped_others_unaffected() {
    let mut config = common::patient_config();
    config.broadcast.subscriber_queue_capacity = 4;
    let h = harness(config);
    let mission = h.core.create_mission(request(&["10.9.9.1"])).unwrap();
    // Round-trip a snapshot so mission startup events precede the
    // subscriptions; both streams then carry exactly the alerts below
    h.core.mission_snapshot(mission.id).await.unwrap();

    let mut slow = h.core.subscribe(mission.id, None).unwrap();
    let mut healthy = h.core.subscribe(mission.id, None).unwrap();

    let mut healthy_seen = Vec::new();
    for index in 0..10 {
        h.core.submit(alert(mission.id, index)).await.unwrap();
        // Healthy keeps draining; slow never reads
        while let Some(frame) = healthy.try_next_frame() {
            if let Some(sequence) = frame.sequence() {
                healthy_seen.push(sequence);
            }
        }
    }

    // Healthy saw every alert, in order and gap-free
    assert_eq!(healthy_seen.len(), 10);
    assert!(healthy_seen.windows(2).all(|w| w[1] == w[0] + 1));

    h.core.abort_mission(mission.id).await.unwrap();
    let mut healthy_ended = false;
    while let Some(frame) = healthy.next_frame().await {
        if matches!(frame, StreamFrame::EndOfMission { status: MissionStatus::Aborted }) {
            healthy_ended = true;
            break;
        }
    }
    assert!(healthy_ended);

    // The slow subscriber was disconnected when its queue filled: it gets
    // its buffered frames, then a closed channel with no end marker
    let mut slow_frames = 0;
    while let Some(frame) = slow.next_frame().await {
        assert!(!matches!(frame, StreamFrame::EndOfMission { .. }));
        slow_frames += 1;
    }
    assert_eq!(slow_frames, 4);
}

#[tokio::test]
async fn test_late_joiner_past_backlog_gets_gap_frame() {
    let mut config = common::patient_config();
    config.broadcast.backlog_capacity = 4;
    let h = harness(config);
    let mission = h.core.create_mission(request(&["10.9.9.2"])).unwrap();

    for index in 0..10 {
        h.core.submit(alert(mission.id, index)).await.unwrap();
    }

    // Sequence 1 is long evicted from a backlog of 4
    let mut subscription = h.core.subscribe(mission.id, Some(1)).unwrap();
    let first = subscription.try_next_frame().expect("expected a frame");
    let StreamFrame::Gap { retained_from } = first else {
        panic!("expected a gap frame first");
    };
    assert!(retained_from > 1);

    // Replay resumes exactly at the retention boundary
    let next = subscription.try_next_frame().expect("expected backfill");
    assert_eq!(next.sequence(), Some(retained_from));
}

/// State-relevant projection of a snapshot, ignoring wall-clock fields
fn projection(snapshot: &MissionSnapshot) -> (MissionStatus, u64, Vec<(String, TargetStage, Vec<String>)>) {
    (
        snapshot.mission.status,
        snapshot.last_sequence,
        snapshot
            .targets
            .iter()
            .map(|t| {
                (
                    t.address.clone(),
                    t.stage,
                    t.findings.iter().map(|f| f.identifier.clone()).collect(),
                )
            })
            .collect(),
    )
}

#[tokio::test]
async fn test_replay_reproduces_identical_projection() {
    let mission_id = Uuid::from_u128(0xA11CE);
    let address = "10.9.9.3";
    let target_id = MissionState::target_id_for(mission_id, address);

    let log = vec![
        RawEvent::new(EventType::ReconCompleted, "recon-engine", mission_id)
            .with_target(target_id)
            .with_correlation(Uuid::from_u128(1))
            .with_payload(json!({ "open_ports": [443] })),
        RawEvent::new(EventType::VulnScanCompleted, "vuln-scanner", mission_id)
            .with_target(target_id)
            .with_correlation(Uuid::from_u128(2))
            .with_payload(json!({ "findings": [common::finding("CVE-2024-1111", "critical")] })),
        RawEvent::new(EventType::ExploitSuccess, "exploit-agent", mission_id)
            .with_target(target_id)
            .with_correlation(Uuid::from_u128(3))
            .with_payload(json!({ "payload_ref": "exploit-7" })),
        RawEvent::new(EventType::PersistenceEstablished, "persistence-agent", mission_id)
            .with_target(target_id)
            .with_correlation(Uuid::from_u128(4))
            .with_payload(json!({ "mechanism": "cron" })),
    ];

    let mut projections = Vec::new();
    for _ in 0..2 {
        let h = harness(common::patient_config());
        h.core
            .create_mission_with_id(mission_id, request(&[address]))
            .unwrap();
        for raw in &log {
            h.core.submit(raw.clone()).await.unwrap();
        }
        let snapshot = h.core.mission_snapshot(mission_id).await.unwrap();
        projections.push(projection(&snapshot));
    }

    assert_eq!(projections[0], projections[1]);
    assert_eq!(projections[0].0, MissionStatus::Complete);
    assert_eq!(projections[0].2[0].1, TargetStage::Persisted);
}
