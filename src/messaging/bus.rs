//! # Event Bus Adapter
//!
//! Thin abstraction over the durable publish/subscribe transport carrying
//! work messages to external workers. The transport promises at-least-once
//! delivery and no cross-queue ordering; everything that makes those
//! semantics safe (dedup, sequencing) lives in the orchestrator core, so the
//! adapter stays a dumb pipe.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::errors::{MessagingError, MessagingResult};
use super::message::WorkMessage;

/// Outbound transport for work messages
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish a work message to the queue for its stage
    async fn publish_work(&self, message: WorkMessage) -> MessagingResult<()>;
}

/// In-process bus implementation backed by per-queue channels
///
/// Used by the test harness and the single-process deployment. Workers attach
/// to a stage queue and receive every message published to it; messages
/// published with no attached worker are dropped after a warning, matching a
/// durable broker with no bound consumer from the orchestrator's perspective
/// (the dispatch deadline handles the missing result either way).
#[derive(Default)]
pub struct InMemoryEventBus {
    queues: DashMap<String, mpsc::UnboundedSender<WorkMessage>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a worker to a queue, receiving all subsequent messages for it
    pub fn attach_worker(&self, queue_name: &str) -> mpsc::UnboundedReceiver<WorkMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.queues.insert(queue_name.to_string(), tx);
        rx
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish_work(&self, message: WorkMessage) -> MessagingResult<()> {
        let queue_name = message.queue_name();
        match self.queues.get(&queue_name) {
            Some(sender) => {
                debug!(
                    queue = %queue_name,
                    correlation_id = %message.correlation_id,
                    retry_count = message.metadata.retry_count,
                    "Publishing work message"
                );
                sender.send(message).map_err(|e| {
                    MessagingError::queue_operation(&queue_name, "send", e.to_string())
                })
            }
            None => {
                warn!(
                    queue = %queue_name,
                    correlation_id = %message.correlation_id,
                    "No worker attached to queue, message dropped"
                );
                Ok(())
            }
        }
    }
}
