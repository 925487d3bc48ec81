//! Application configuration.
//!
//! Aggregates storage, delete and audit settings into a single Config
//! struct that can be loaded from YAML files or environment variables.

mod storage;

pub use storage::{PostgresConfig, SqliteConfig, StorageConfig, StorageType};

use serde::Deserialize;

use crate::repository::DeletePolicy;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "waypoint.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "WAYPOINT_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "WAYPOINT";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "WAYPOINT_LOG";

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// How deletes of records with children behave.
    pub delete: DeleteConfig,
    /// Audit tool behaviour.
    pub audit: AuditConfig,
}

/// Delete configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct DeleteConfig {
    pub policy: DeletePolicy,
}

/// Audit tool configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Exit non-zero when any error-severity finding exists.
    /// Default: true
    pub fail_on_error: bool,
    /// Audit private journeys and entries too; when false only the public
    /// view is audited.
    /// Default: true
    pub include_private: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            fail_on_error: true,
            include_private: true,
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `waypoint.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX` prefix
    pub fn load(path: Option<&str>) -> Result<Self, ::config::ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Create config for testing: in-memory storage, defaults elsewhere.
    pub fn for_test() -> Self {
        Self {
            storage: StorageConfig {
                storage_type: StorageType::Memory,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
