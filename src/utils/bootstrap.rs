//! Bootstrap utilities for waypoint binaries.
//!
//! Shared initialization code for the command-line tools.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, LOG_ENV_VAR};
use crate::repository::JourneyRepository;
use crate::storage::{self, StorageError};

/// Initialize tracing with WAYPOINT_LOG environment variable.
///
/// Defaults to "info" level if WAYPOINT_LOG is not set. Logs go to stderr
/// so stdout stays free for command output.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Open the configured store and wrap it in a repository.
pub async fn open_repository(config: &Config) -> Result<JourneyRepository, StorageError> {
    let store = storage::init_storage(&config.storage).await?;
    info!(
        storage = ?config.storage.storage_type,
        delete_policy = ?config.delete.policy,
        "repository ready"
    );
    Ok(JourneyRepository::with_policy(store, config.delete.policy))
}
