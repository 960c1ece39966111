//! # Structured Logging Module
//!
//! Environment-aware structured logging for debugging the async orchestration
//! pipeline: mission actors, dispatch timers, and broadcast delivery tasks.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment);

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(log_level.clone()));

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(true)
                .with_filter(filter),
        );

        // Use try_init to avoid panic if a global subscriber already exists
        // (test harnesses install their own)
        if subscriber.try_init().is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        }

        tracing::info!(
            environment = %environment,
            level = %log_level,
            "🔧 STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("ARES_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Log structured data for mission operations
pub fn log_mission_operation(
    operation: &str,
    mission_id: Option<uuid::Uuid>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        mission_id = mission_id.map(|id| id.to_string()),
        status = %status,
        details = details,
        "🎯 MISSION_OPERATION"
    );
}

/// Log structured data for dispatch operations
pub fn log_dispatch_operation(
    operation: &str,
    mission_id: Option<uuid::Uuid>,
    target_id: Option<uuid::Uuid>,
    correlation_id: Option<uuid::Uuid>,
    status: &str,
) {
    tracing::info!(
        operation = %operation,
        mission_id = mission_id.map(|id| id.to_string()),
        target_id = target_id.map(|id| id.to_string()),
        correlation_id = correlation_id.map(|id| id.to_string()),
        status = %status,
        "📡 DISPATCH_OPERATION"
    );
}
