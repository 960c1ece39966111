//! Orchestrator Binary
//!
//! Standalone binary running the A.R.E.S. orchestration core with its REST
//! and WebSocket surface, backed by in-process work queues.

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;

use ares_core::config::ConfigManager;
use ares_core::logging::init_structured_logging;
use ares_core::messaging::InMemoryEventBus;
use ares_core::orchestration::OrchestrationCore;
use ares_core::web::{create_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_structured_logging();

    let manager = ConfigManager::load().context("configuration load failed")?;
    let config = manager.config().clone();
    let environment = manager.environment().to_string();
    let bind_address = config.web.bind_address.clone();

    info!(environment = %environment, "Starting A.R.E.S. orchestrator");

    let bus = Arc::new(InMemoryEventBus::new());
    let core = OrchestrationCore::new(config, bus);
    let state = AppState::new(core, environment);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    info!(bind_address = %bind_address, "🚀 Orchestrator listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("web server failed")?;

    info!("Orchestrator stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("Shutdown signal received");
}
