//! In-memory document store.
//!
//! Serves as the `memory` storage backend and as the test double for the
//! repository, with switches to inject failures.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::helpers::{apply_list_query, assign_id, merge};
use super::{Document, DocumentStore, ListQuery, Result, StorageError};

/// Mock document store that keeps collections in memory.
#[derive(Default)]
pub struct MockDocumentStore {
    collections: RwLock<HashMap<String, HashMap<String, Document>>>,
    fail_on_list: RwLock<bool>,
    fail_on_write: RwLock<bool>,
    fail_writes_to: RwLock<HashSet<String>>,
    fail_on_delete: RwLock<HashSet<String>>,
}

impl MockDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `list` call fail.
    pub async fn set_fail_on_list(&self, fail: bool) {
        *self.fail_on_list.write().await = fail;
    }

    /// Make every `create` and `update` call fail.
    pub async fn set_fail_on_write(&self, fail: bool) {
        *self.fail_on_write.write().await = fail;
    }

    /// Make `create` and `update` fail in one collection only.
    pub async fn fail_writes_to(&self, collection: &str) {
        self.fail_writes_to.write().await.insert(collection.to_string());
    }

    /// Make `delete` of the document with `id` fail, in any collection.
    pub async fn fail_delete_of(&self, id: &str) {
        self.fail_on_delete.write().await.insert(id.to_string());
    }

    pub async fn clear_failures(&self) {
        *self.fail_on_list.write().await = false;
        *self.fail_on_write.write().await = false;
        self.fail_writes_to.write().await.clear();
        self.fail_on_delete.write().await.clear();
    }

    /// Store a document as-is, bypassing id assignment and duplicate
    /// checks. Used to stage legacy or inconsistent data.
    pub async fn insert_raw(&self, collection: &str, id: &str, doc: Document) {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), doc);
    }

    pub async fn get_stored(&self, collection: &str, id: &str) -> Option<Document> {
        self.collections
            .read()
            .await
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned()
    }

    pub async fn stored_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, HashMap::len)
    }

    async fn check_write(&self, op: &str, collection: &str) -> Result<()> {
        if *self.fail_on_write.read().await || self.fail_writes_to.read().await.contains(collection) {
            return Err(StorageError::Backend(format!("injected {op} failure on {collection}")));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn list(&self, collection: &str, query: &ListQuery) -> Result<Vec<Document>> {
        if *self.fail_on_list.read().await {
            return Err(StorageError::Backend(format!("injected list failure on {collection}")));
        }
        let store = self.collections.read().await;
        let docs = store
            .get(collection)
            .map(|docs| docs.values().cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        Ok(apply_list_query(docs, query))
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        Ok(self.get_stored(collection, id).await)
    }

    async fn create(&self, collection: &str, mut doc: Document) -> Result<String> {
        self.check_write("create", collection).await?;
        let id = assign_id(collection, &mut doc)?;

        let mut store = self.collections.write().await;
        let docs = store.entry(collection.to_string()).or_default();
        if docs.contains_key(&id) {
            return Err(StorageError::AlreadyExists {
                collection: collection.to_string(),
                id,
            });
        }
        docs.insert(id.clone(), doc);
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, partial: Document) -> Result<()> {
        self.check_write("update", collection).await?;
        let mut store = self.collections.write().await;
        let doc = store
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StorageError::not_found(collection, id))?;
        merge(collection, id, doc, partial)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        if self.fail_on_delete.read().await.contains(id) {
            return Err(StorageError::Backend(format!("injected delete failure on {collection}/{id}")));
        }
        let mut store = self.collections.write().await;
        store
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .map(|_| ())
            .ok_or_else(|| StorageError::not_found(collection, id))
    }
}
