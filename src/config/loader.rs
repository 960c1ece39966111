//! Configuration Loader
//!
//! Environment-aware configuration loading. Discovers a base YAML file plus an
//! optional environment override file and merges them over the built-in
//! defaults, then validates the result. Missing files fall back to defaults so
//! the core can boot in test environments without a config directory.

use super::error::{ConfigResult, ConfigurationError};
use super::AresConfig;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

const BASE_CONFIG_FILE: &str = "ares.yaml";

/// Loaded configuration plus the environment it was resolved for
pub struct ConfigManager {
    config: AresConfig,
    environment: String,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with an explicit
    /// environment, useful for tests that must not mutate process env vars
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let config_directory = config_dir.unwrap_or_else(Self::default_config_directory);

        debug!(
            "Loading configuration for environment '{}' from directory: {}",
            environment,
            config_directory.display()
        );

        let mut config = AresConfig::default();

        let base_path = config_directory.join(BASE_CONFIG_FILE);
        if base_path.exists() {
            config = Self::parse_file(&base_path)?;
        } else {
            warn!(
                "Base configuration file not found at {}, using built-in defaults",
                base_path.display()
            );
        }

        let env_path = config_directory.join(format!("ares.{environment}.yaml"));
        if env_path.exists() {
            let overrides = Self::parse_file(&env_path)?;
            config = Self::merge(config, overrides);
        }

        config.validate()?;

        debug!(
            environment = %environment,
            bind_address = %config.web.bind_address,
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
        }))
    }

    /// Build a manager directly from an in-memory config (test entry point)
    pub fn from_config(config: AresConfig, environment: &str) -> ConfigResult<Arc<ConfigManager>> {
        config.validate()?;
        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
        }))
    }

    pub fn config(&self) -> &AresConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    fn detect_environment() -> String {
        env::var("ARES_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string())
    }

    fn default_config_directory() -> PathBuf {
        env::var("ARES_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"))
    }

    fn parse_file(path: &Path) -> ConfigResult<AresConfig> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigurationError::FileRead {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigurationError::ParseError {
            path: path.display().to_string(),
            source,
        })
    }

    /// Environment override wins section-by-section. Override files carry
    /// whole sections, so a field-level merge is not needed.
    fn merge(base: AresConfig, overrides: AresConfig) -> AresConfig {
        let mut merged = base;
        let default = AresConfig::default();

        // Compare serialized sections to detect which ones the override file set
        fn section_overridden<T: serde::Serialize>(value: &T, default: &T) -> bool {
            serde_yaml::to_string(value).ok() != serde_yaml::to_string(default).ok()
        }

        if section_overridden(&overrides.orchestrator, &default.orchestrator) {
            merged.orchestrator = overrides.orchestrator;
        }
        if section_overridden(&overrides.dispatch, &default.dispatch) {
            merged.dispatch = overrides.dispatch;
        }
        if section_overridden(&overrides.broadcast, &default.broadcast) {
            merged.broadcast = overrides.broadcast;
        }
        if section_overridden(&overrides.web, &default.web) {
            merged.web = overrides.web;
        }
        merged
    }
}
