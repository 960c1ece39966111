//! # Message Structures for the Work Bus
//!
//! Wire formats exchanged with worker services over the message bus. The
//! orchestrator only inspects envelope fields; `payload` is opaque and owned
//! by the worker domain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::state_machine::WorkStage;

/// Outbound work dispatch message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkMessage {
    pub correlation_id: Uuid,
    pub mission_id: Uuid,
    pub target_id: Uuid,
    pub stage: WorkStage,
    /// Stage-specific instructions, opaque to the orchestrator
    pub payload: Value,
    pub metadata: WorkMessageMetadata,
}

/// Metadata carried with every work message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkMessageMetadata {
    /// When the message was created
    pub created_at: DateTime<Utc>,
    /// Current retry count (0 for the first dispatch)
    pub retry_count: u32,
    /// Maximum retry attempts
    pub max_retries: u32,
    /// Worker deadline in milliseconds
    pub deadline_ms: u64,
}

impl WorkMessage {
    pub fn new(
        correlation_id: Uuid,
        mission_id: Uuid,
        target_id: Uuid,
        stage: WorkStage,
        payload: Value,
        retry_count: u32,
        max_retries: u32,
        deadline_ms: u64,
    ) -> Self {
        Self {
            correlation_id,
            mission_id,
            target_id,
            stage,
            payload,
            metadata: WorkMessageMetadata {
                created_at: Utc::now(),
                retry_count,
                max_retries,
                deadline_ms,
            },
        }
    }

    /// Queue name for this message based on the work stage
    pub fn queue_name(&self) -> String {
        format!("{}_queue", self.stage)
    }
}
