//! # AresCore Configuration System
//!
//! Explicit, validated configuration for the orchestration core. Tunable
//! values (retry limits, deadlines, backlog and queue sizing, stall windows)
//! live here rather than as hardcoded constants, with YAML files providing
//! environment-specific overrides.

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Top-level configuration for the orchestration core
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AresConfig {
    pub orchestrator: OrchestratorConfig,
    pub dispatch: DispatchConfig,
    pub broadcast: BroadcastConfig,
    pub web: WebConfig,
}

/// Orchestrator Core settings: sequencing, dedup, stall detection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Capacity of each mission actor's command channel
    pub command_channel_capacity: usize,
    /// Bounded per-mission set of recently seen correlation ids
    pub dedup_set_capacity: usize,
    /// Interval between stall-detection ticks, in milliseconds
    pub stall_tick_ms: u64,
    /// A target with no state change for this long is considered stalled
    pub quiescence_window_ms: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            command_channel_capacity: 256,
            dedup_set_capacity: 256,
            stall_tick_ms: 5_000,
            quiescence_window_ms: 60_000,
        }
    }
}

impl OrchestratorConfig {
    pub fn stall_tick(&self) -> Duration {
        Duration::from_millis(self.stall_tick_ms)
    }

    pub fn quiescence_window(&self) -> Duration {
        Duration::from_millis(self.quiescence_window_ms)
    }
}

/// Dispatch Coordinator settings: deadlines, retries, backoff
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Maximum retry attempts before a work request is declared exhausted
    pub max_retries: u32,
    /// Deadline for a worker result, in milliseconds
    pub deadline_ms: u64,
    /// Exponential backoff base applied per retry
    pub backoff_base: u32,
    /// Upper bound on a single backoff delay, in milliseconds
    pub backoff_cap_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            deadline_ms: 2_000,
            backoff_base: 2,
            backoff_cap_ms: 30_000,
        }
    }
}

impl DispatchConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    /// Backoff delay before retry attempt `retry_count` (1-based), capped
    pub fn backoff_delay(&self, retry_count: u32) -> Duration {
        let factor = self
            .backoff_base
            .checked_pow(retry_count.saturating_sub(1))
            .unwrap_or(u32::MAX) as u64;
        let delay_ms = self.deadline_ms.saturating_mul(factor);
        Duration::from_millis(delay_ms.min(self.backoff_cap_ms))
    }
}

/// Broadcast Hub settings: backlog retention and subscriber queues
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// Retained events per mission for late-joining subscribers
    pub backlog_capacity: usize,
    /// Outbound queue capacity per subscriber
    pub subscriber_queue_capacity: usize,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            backlog_capacity: 1_024,
            subscriber_queue_capacity: 64,
        }
    }
}

/// Web API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind_address: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

impl AresConfig {
    /// Validate cross-field constraints that serde defaults cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        if self.orchestrator.dedup_set_capacity == 0 {
            return Err(ConfigurationError::invalid_value(
                "orchestrator.dedup_set_capacity",
                "must be at least 1",
            ));
        }
        if self.broadcast.backlog_capacity == 0 {
            return Err(ConfigurationError::invalid_value(
                "broadcast.backlog_capacity",
                "must be at least 1",
            ));
        }
        if self.broadcast.subscriber_queue_capacity == 0 {
            return Err(ConfigurationError::invalid_value(
                "broadcast.subscriber_queue_capacity",
                "must be at least 1",
            ));
        }
        if self.dispatch.backoff_base < 1 {
            return Err(ConfigurationError::invalid_value(
                "dispatch.backoff_base",
                "must be at least 1",
            ));
        }
        if self.web.bind_address.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigurationError::invalid_value(
                "web.bind_address",
                "must be a host:port socket address",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AresConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dispatch.max_retries, 3);
        assert_eq!(config.dispatch.deadline(), Duration::from_secs(2));
    }

    #[test]
    fn test_backoff_progression_is_capped() {
        let dispatch = DispatchConfig::default();
        assert_eq!(dispatch.backoff_delay(1), Duration::from_millis(2_000));
        assert_eq!(dispatch.backoff_delay(2), Duration::from_millis(4_000));
        assert_eq!(dispatch.backoff_delay(3), Duration::from_millis(8_000));
        // Deep retry counts saturate at the cap instead of overflowing
        assert_eq!(dispatch.backoff_delay(30), Duration::from_millis(30_000));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut config = AresConfig::default();
        config.broadcast.subscriber_queue_capacity = 0;
        assert!(config.validate().is_err());
    }
}
