//! In-process document store used by tests.

use crate::services::store::{id_to_string, DocumentStore, StoreError};
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Keeps documents per collection in insertion order. Filters match by
/// plain equality on top-level fields.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<BTreeMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything stored in `collection`.
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.collections
            .lock()
            .map(|c| c.get(collection).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    pub fn count(&self, collection: &str) -> usize {
        self.documents(collection).len()
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn is_available(&self) -> bool {
        true
    }

    async fn insert_document(
        &self,
        collection: &str,
        mut document: Document,
    ) -> Result<String, StoreError> {
        if !document.contains_key("_id") {
            document.insert("_id", ObjectId::new());
        }
        let id = document.get("_id").cloned().map(id_to_string).unwrap_or_default();

        self.collections
            .lock()
            .map_err(|e| StoreError::Operation(format!("Memory store mutex poisoned: {}", e)))?
            .entry(collection.to_string())
            .or_default()
            .push(document);

        Ok(id)
    }

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        limit: i64,
    ) -> Result<Vec<Document>, StoreError> {
        let limit = usize::try_from(limit).unwrap_or(0);
        let collections = self
            .collections
            .lock()
            .map_err(|e| StoreError::Operation(format!("Memory store mutex poisoned: {}", e)))?;

        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| matches(d, &filter))
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        let collections = self
            .collections
            .lock()
            .map_err(|e| StoreError::Operation(format!("Memory store mutex poisoned: {}", e)))?;
        Ok(collections.keys().cloned().collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
