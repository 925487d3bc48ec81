//! Document storage.
//!
//! Journey data lives in three flat collections of JSON documents. Every
//! backend implements [`DocumentStore`]; typed access goes through
//! [`crate::repository::JourneyRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info};

use crate::config::{StorageConfig, StorageType};

pub mod helpers;
pub mod mock;
#[cfg(any(feature = "sqlite", feature = "postgres"))]
pub mod schema;
#[cfg(any(feature = "sqlite", feature = "postgres"))]
pub mod sql;

pub use mock::MockDocumentStore;

#[cfg(feature = "postgres")]
pub use sql::postgres::PostgresDocumentStore;
#[cfg(feature = "sqlite")]
pub use sql::sqlite::SqliteDocumentStore;

/// Collection holding journeys.
pub const JOURNEYS: &str = "journeys";
/// Collection holding phases.
pub const PHASES: &str = "journeyPhases";
/// Collection holding entries.
pub const ENTRIES: &str = "journeyEntries";

/// Field carrying the document id.
pub const ID_FIELD: &str = "id";

/// A stored document: a JSON object whose `id` field is its key.
pub type Document = serde_json::Map<String, Value>;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Document not found: collection={collection}, id={id}")]
    NotFound { collection: String, id: String },

    #[error("Document already exists: collection={collection}, id={id}")]
    AlreadyExists { collection: String, id: String },

    #[error("Invalid document: collection={collection}, id={id}: {reason}")]
    InvalidDocument {
        collection: String,
        id: String,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[cfg(any(feature = "sqlite", feature = "postgres"))]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Unsupported storage backend: {0}")]
    UnsupportedBackend(String),
}

impl StorageError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        StorageError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    pub fn invalid(collection: &str, id: &str, reason: impl Into<String>) -> Self {
        StorageError::InvalidDocument {
            collection: collection.to_string(),
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

/// Sort direction for [`ListQuery::order_by`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Equality filter on a top-level field.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

/// Sort key for a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// Filters and ordering for [`DocumentStore::list`].
///
/// Results are always fully ordered: after `order_by` (if any), ties break
/// by document id ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub filters: Vec<Filter>,
    pub order_by: Option<OrderBy>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep documents whose `field` equals `value`.
    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            direction,
        });
        self
    }

    /// Whether `doc` passes every filter.
    pub fn matches(&self, doc: &Document) -> bool {
        self.filters
            .iter()
            .all(|f| doc.get(&f.field).unwrap_or(&Value::Null) == &f.value)
    }
}

/// Persistence contract for journey documents.
///
/// Implementations:
/// - `MockDocumentStore`: in-memory, also the `memory` backend
/// - `SqliteDocumentStore`: SQLite storage
/// - `PostgresDocumentStore`: PostgreSQL storage
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List documents of a collection matching `query`.
    async fn list(&self, collection: &str, query: &ListQuery) -> Result<Vec<Document>>;

    /// Fetch one document. Returns `None` if it does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Insert a document and return its id.
    ///
    /// Uses the document's `id` field when present, otherwise generates a
    /// UUID v4 and writes it into the stored document.
    async fn create(&self, collection: &str, doc: Document) -> Result<String>;

    /// Shallow-merge `partial` into an existing document.
    ///
    /// Fails with `NotFound` when the document does not exist.
    async fn update(&self, collection: &str, id: &str, partial: Document) -> Result<()>;

    /// Remove one document. Fails with `NotFound` when it does not exist.
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;
}

/// Initialize storage based on configuration.
pub async fn init_storage(config: &StorageConfig) -> Result<Arc<dyn DocumentStore>> {
    match config.storage_type {
        StorageType::Memory => {
            info!("Storage: in-memory");
            Ok(Arc::new(MockDocumentStore::new()))
        }
        #[cfg(feature = "sqlite")]
        StorageType::Sqlite => {
            info!("Storage: sqlite at {}", config.sqlite.path);
            if let Some(parent) = std::path::Path::new(&config.sqlite.path).parent() {
                std::fs::create_dir_all(parent).map_err(|e| StorageError::Backend(e.to_string()))?;
            }

            let pool =
                sqlx::SqlitePool::connect(&format!("sqlite:{}?mode=rwc", config.sqlite.path)).await?;
            let store = SqliteDocumentStore::new(pool);
            store.init().await?;
            Ok(Arc::new(store))
        }
        #[cfg(feature = "postgres")]
        StorageType::Postgres => {
            info!("Storage: postgres");
            let pool = sqlx::PgPool::connect(&config.postgres.uri).await?;
            let store = PostgresDocumentStore::new(pool);
            store.init().await?;
            Ok(Arc::new(store))
        }
        #[allow(unreachable_patterns)]
        other => {
            error!("Storage type {:?} requested but its feature is not enabled", other);
            Err(StorageError::UnsupportedBackend(format!("{:?}", other)))
        }
    }
}
