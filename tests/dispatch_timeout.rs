//! Deadline and retry behavior under tokio's paused clock: an unanswered
//! work request is retried with exponential backoff and the target is
//! abandoned when retries run out, completing the mission.

mod common;

use std::time::Duration;

use common::harness;

use ares_core::broadcast::StreamFrame;
use ares_core::config::AresConfig;
use ares_core::events::EventType;
use ares_core::models::MissionRequest;
use ares_core::state_machine::{MissionStatus, TargetStage};

/// Run spawned tasks and timers forward one simulated second at a time
async fn advance_seconds(seconds: u64) {
    for _ in 0..seconds {
        tokio::time::advance(Duration::from_secs(1)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_unanswered_work_is_retried_then_abandoned() {
    // Defaults: 2s deadline, base-2 backoff, 3 attempts (2s + 4s + 8s)
    let h = harness(AresConfig::default());
    let mission = h
        .core
        .create_mission(MissionRequest {
            name: "silent-range".to_string(),
            scope: vec!["10.0.0.66".to_string()],
        })
        .unwrap();

    let mut subscription = h.core.subscribe(mission.id, Some(1)).unwrap();

    // Nothing consumes the scan queue, so every attempt times out
    advance_seconds(20).await;

    let snapshot = h.core.mission_snapshot(mission.id).await.unwrap();
    assert_eq!(snapshot.targets[0].stage, TargetStage::Abandoned);
    assert_eq!(snapshot.mission.status, MissionStatus::Complete);

    let mut sequences = Vec::new();
    let mut types = Vec::new();
    let mut ended = false;
    while let Some(frame) = subscription.try_next_frame() {
        match frame {
            StreamFrame::Event(event) => {
                sequences.push(event.sequence);
                types.push(event.event_type);
            }
            StreamFrame::EndOfMission { status } => {
                assert_eq!(status, MissionStatus::Complete);
                ended = true;
                break;
            }
            StreamFrame::Gap { .. } => panic!("no gap expected"),
        }
    }
    assert!(ended, "stream did not terminate");

    // Gap-free sequence from the very first event
    let expected: Vec<u64> = (1..=sequences.len() as u64).collect();
    assert_eq!(sequences, expected);

    assert_eq!(
        types,
        vec![
            EventType::MissionCreated,
            EventType::DispatchIssued,
            EventType::DispatchRetry,
            EventType::DispatchRetry,
            EventType::DispatchExhausted,
            EventType::TargetStageChanged,
            EventType::MissionCompleted,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_result_in_time_cancels_retry_timer() {
    let h = harness(AresConfig::default());
    let mut scan = h.bus.attach_worker("scan_queue");
    let mission = h
        .core
        .create_mission(MissionRequest {
            name: "responsive-range".to_string(),
            scope: vec!["10.0.0.67".to_string()],
        })
        .unwrap();

    let mut subscription = h.core.subscribe(mission.id, Some(1)).unwrap();

    // The scan is answered immediately; the analyze dispatch that follows is
    // never answered and runs its full retry schedule
    let work = common::expect_work(&mut scan, "scan_queue").await;
    h.core
        .submit(common::result_for(
            &work,
            EventType::ReconCompleted,
            "recon-engine",
            serde_json::json!({}),
        ))
        .await
        .unwrap();

    advance_seconds(20).await;

    let mut types = Vec::new();
    while let Some(frame) = subscription.try_next_frame() {
        match frame {
            StreamFrame::Event(event) => types.push(event.event_type),
            StreamFrame::EndOfMission { .. } => break,
            StreamFrame::Gap { .. } => panic!("no gap expected"),
        }
    }

    // Exactly two retries, and both belong to the unanswered analyze
    // dispatch; the answered scan fired none
    assert_eq!(
        types,
        vec![
            EventType::MissionCreated,
            EventType::DispatchIssued,
            EventType::ReconCompleted,
            EventType::TargetStageChanged,
            EventType::DispatchIssued,
            EventType::DispatchRetry,
            EventType::DispatchRetry,
            EventType::DispatchExhausted,
            EventType::TargetStageChanged,
            EventType::MissionCompleted,
        ]
    );

    let snapshot = h.core.mission_snapshot(mission.id).await.unwrap();
    assert_eq!(snapshot.targets[0].stage, TargetStage::Abandoned);
    assert_eq!(snapshot.mission.status, MissionStatus::Complete);
}
