//! Domain repositories.

mod journey;

pub use journey::JourneyRepository;

use std::fmt;

use serde::Deserialize;

use crate::storage::{self, StorageError};
use crate::validation::ValidationError;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Record kinds handled by the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Journey,
    Phase,
    Entry,
}

impl EntityKind {
    /// Collection the kind is stored in.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Journey => storage::JOURNEYS,
            EntityKind::Phase => storage::PHASES,
            EntityKind::Entry => storage::ENTRIES,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Journey => "Journey",
            EntityKind::Phase => "Phase",
            EntityKind::Entry => "Entry",
        };
        f.write_str(name)
    }
}

/// What deleting a journey or phase does to its children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Refuse while children exist.
    #[default]
    Reject,
    /// Delete children first, leaf to root.
    Cascade,
}

/// Errors that can occur during repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{kind} {id} still has {dependents} dependent record(s)")]
    DependentsExist {
        kind: EntityKind,
        id: String,
        dependents: usize,
    },

    #[error(
        "Delete of {kind} {id} stopped after {} of {} documents: {source}",
        .deleted.len(),
        .deleted.len() + .remaining.len()
    )]
    PartialDelete {
        kind: EntityKind,
        id: String,
        /// Ids removed before the failure, in deletion order.
        deleted: Vec<String>,
        /// Ids still stored, the failing one first.
        remaining: Vec<String>,
        source: StorageError,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl RepositoryError {
    pub(crate) fn not_found(kind: EntityKind, id: &str) -> Self {
        RepositoryError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Map a store `NotFound` to the typed repository error.
    pub(crate) fn from_store(kind: EntityKind, err: StorageError) -> Self {
        match err {
            StorageError::NotFound { id, .. } => RepositoryError::NotFound { kind, id },
            other => RepositoryError::Storage(other),
        }
    }
}
