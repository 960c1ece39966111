//! # Web API Application State
//!
//! Shared state for the web API: the orchestration core plus the static
//! service metadata surfaced by health checks.

use std::sync::Arc;

use crate::orchestration::OrchestrationCore;

/// Shared application state for all handlers
pub struct AppState {
    pub core: Arc<OrchestrationCore>,
    pub environment: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(core: Arc<OrchestrationCore>, environment: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            core,
            environment: environment.into(),
            started_at: chrono::Utc::now(),
        })
    }
}
