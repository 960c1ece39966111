//! Shared helpers for integration tests: a core wired to an in-process bus
//! plus scripted worker loops.
#![allow(dead_code)]

pub mod strategies;

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::timeout;

use ares_core::config::AresConfig;
use ares_core::events::{EventType, RawEvent};
use ares_core::messaging::{EventBus, InMemoryEventBus, WorkMessage};
use ares_core::orchestration::OrchestrationCore;

pub struct TestHarness {
    pub core: Arc<OrchestrationCore>,
    pub bus: Arc<InMemoryEventBus>,
}

pub fn harness(config: AresConfig) -> TestHarness {
    let bus = Arc::new(InMemoryEventBus::new());
    let core = OrchestrationCore::new(config, Arc::clone(&bus) as Arc<dyn EventBus>);
    TestHarness { core, bus }
}

/// Default config with a deadline long enough that scripted workers never
/// race a retry timer
pub fn patient_config() -> AresConfig {
    let mut config = AresConfig::default();
    config.dispatch.deadline_ms = 30_000;
    config
}

/// Receive the next work message from a queue, failing after two seconds
pub async fn expect_work(
    rx: &mut mpsc::UnboundedReceiver<WorkMessage>,
    queue: &str,
) -> WorkMessage {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for work on {queue}"))
        .unwrap_or_else(|| panic!("{queue} closed"))
}

/// A worker result event answering a dispatched work message
pub fn result_for(
    work: &WorkMessage,
    event_type: EventType,
    source: &str,
    payload: Value,
) -> RawEvent {
    RawEvent::new(event_type, source, work.mission_id)
        .with_target(work.target_id)
        .with_correlation(work.correlation_id)
        .with_payload(payload)
}

pub fn finding(identifier: &str, severity: &str) -> Value {
    serde_json::json!({ "identifier": identifier, "severity": severity })
}
