//! In-memory document store for development and testing.

use async_trait::async_trait;
use std::collections::HashMap;
use taskrec_core::{
    Document, DocumentStore,
    error::{Result, TaskrecError},
};
use tokio::sync::RwLock;

/// Keeps every collection in process memory; nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, HashMap<String, Document>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub async fn document_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, HashMap::len)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .and_then(|documents| documents.get(key))
            .cloned())
    }

    async fn get_all(&self, collection: &str) -> Result<Vec<Document>> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .map(|documents| documents.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn set(&self, collection: &str, key: &str, document: &Document) -> Result<()> {
        if key.is_empty() {
            return Err(TaskrecError::data_access("Document key must not be empty"));
        }
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), document.clone());
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<()> {
        if let Some(documents) = self.collections.write().await.get_mut(collection) {
            documents.remove(key);
        }
        Ok(())
    }

    async fn delete_all(&self, collection: &str) -> Result<()> {
        self.collections.write().await.remove(collection);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = InMemoryDocumentStore::new();
        let document = json!({ "v": 1 }).as_object().cloned().unwrap();

        store.set("a", "k", &document).await.unwrap();
        store.set("b", "k", &document).await.unwrap();
        store.delete_all("a").await.unwrap();

        assert_eq!(store.document_count("a").await, 0);
        assert_eq!(store.document_count("b").await, 1);
        assert_eq!(store.get("b", "k").await.unwrap(), Some(document));
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let store = InMemoryDocumentStore::new();
        store.delete("none", "k").await.unwrap();
        store.delete_all("none").await.unwrap();
        assert!(store.get_all("none").await.unwrap().is_empty());
    }
}
