//! DocumentStore-backed RecordRepository implementation

use crate::config::{DEFAULT_COLLECTION, StoreBackend, StoreConfig};
use crate::storage::{DirDocumentStore, InMemoryDocumentStore};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::marker::PhantomData;
use std::sync::Arc;
use taskrec_core::{
    Document, DocumentStore, RecordRepository, Task, TaskRecord,
    error::Result,
    key::sanitize_key,
};

/// Task record store over a generic document store.
///
/// Records live in a single collection, one document per task keyed by the
/// sanitized task id. Cloning is cheap and every clone shares the same
/// underlying storage, so one store is built at startup and handed to
/// whoever needs it.
///
/// Concurrent `update_record` calls for the same id race; the write that
/// reaches storage last wins.
pub struct RecordStore<T: Task> {
    storage: Arc<dyn DocumentStore>,
    collection: Arc<str>,
    _task: PhantomData<fn() -> T>,
}

impl<T: Task> Clone for RecordStore<T> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            collection: Arc::clone(&self.collection),
            _task: PhantomData,
        }
    }
}

impl<T: Task> RecordStore<T> {
    /// Creates a store using the default collection.
    pub fn new(storage: Arc<dyn DocumentStore>) -> Self {
        Self::with_collection(storage, DEFAULT_COLLECTION)
    }

    pub fn with_collection(storage: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            storage,
            collection: Arc::from(collection.into()),
            _task: PhantomData,
        }
    }

    /// Builds the store described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the store
    /// directory cannot be resolved or created.
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        config.validate()?;
        let storage: Arc<dyn DocumentStore> = match config.backend {
            StoreBackend::Dir => {
                let base_dir = config.resolve_base_dir()?;
                tracing::debug!(base_dir = %base_dir.display(), "opening directory record store");
                Arc::new(DirDocumentStore::new(base_dir).await?)
            }
            StoreBackend::Memory => Arc::new(InMemoryDocumentStore::new()),
        };
        Ok(Self::with_collection(storage, config.collection.clone()))
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn decode(document: Document) -> Result<TaskRecord<T>> {
        TaskRecord::from_document(document).inspect_err(|e| {
            tracing::warn!(error = %e, "failed to decode task record");
        })
    }
}

#[async_trait]
impl<T: Task> RecordRepository<T> for RecordStore<T> {
    async fn all_records(&self, group: Option<&str>) -> Result<Vec<TaskRecord<T>>> {
        let documents = self.storage.get_all(&self.collection).await?;

        let mut records = Vec::with_capacity(documents.len());
        for document in documents {
            let record = Self::decode(document)?;
            if group.is_none_or(|group| record.group() == group) {
                records.push(record);
            }
        }

        tracing::debug!(group, count = records.len(), "listed task records");
        Ok(records)
    }

    async fn all_records_older_than(
        &self,
        age: Duration,
        group: Option<&str>,
    ) -> Result<Vec<TaskRecord<T>>> {
        let now = Utc::now();
        Ok(self
            .all_records(group)
            .await?
            .into_iter()
            .filter(|record| now - record.task.creation_time() > age)
            .collect())
    }

    async fn record_for_id(&self, task_id: &str) -> Result<Option<TaskRecord<T>>> {
        let key = sanitize_key(task_id);
        match self.storage.get(&self.collection, &key).await? {
            Some(document) => Self::decode(document).map(Some),
            None => {
                tracing::debug!(task_id, "no task record");
                Ok(None)
            }
        }
    }

    async fn records_for_ids(&self, task_ids: &[String]) -> Result<Vec<TaskRecord<T>>> {
        let mut records = Vec::with_capacity(task_ids.len());
        for task_id in task_ids {
            if let Some(record) = self.record_for_id(task_id).await? {
                records.push(record);
            }
        }
        Ok(records)
    }

    async fn delete_all_records(&self, group: Option<&str>) -> Result<()> {
        match group {
            None => {
                tracing::debug!(collection = %self.collection, "deleting all task records");
                self.storage.delete_all(&self.collection).await
            }
            Some(group) => {
                let task_ids: Vec<String> = self
                    .all_records(Some(group))
                    .await?
                    .iter()
                    .map(|record| record.task_id().to_string())
                    .collect();
                tracing::debug!(group, count = task_ids.len(), "deleting task records of group");
                self.delete_records_with_ids(&task_ids).await
            }
        }
    }

    async fn delete_record_with_id(&self, task_id: &str) -> Result<()> {
        let key = sanitize_key(task_id);
        self.storage.delete(&self.collection, &key).await
    }

    async fn delete_records_with_ids(&self, task_ids: &[String]) -> Result<()> {
        for task_id in task_ids {
            self.delete_record_with_id(task_id).await?;
        }
        Ok(())
    }

    async fn update_record(&self, record: &TaskRecord<T>) -> Result<()> {
        let key = sanitize_key(record.task_id());
        let document = record.to_document()?;
        self.storage.set(&self.collection, &key, &document).await?;
        tracing::debug!(
            task_id = record.task_id(),
            status = %record.status,
            progress = record.progress,
            "updated task record"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use taskrec_core::{DownloadTask, TaskStatus};
    use tempfile::TempDir;

    async fn create_test_store() -> (RecordStore<DownloadTask>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = DirDocumentStore::new(temp_dir.path()).await.unwrap();
        (RecordStore::new(Arc::new(storage)), temp_dir)
    }

    fn create_test_record(
        id: &str,
        group: &str,
        created: DateTime<Utc>,
    ) -> TaskRecord<DownloadTask> {
        let task = DownloadTask::new(id, format!("https://example.com/{}", id))
            .with_group(group)
            .with_creation_time(created);
        TaskRecord::new(task)
    }

    #[tokio::test]
    async fn test_update_and_find_record() {
        let (store, _temp_dir) = create_test_store().await;

        let record = create_test_record("task-1", "default", Utc::now())
            .with_status(TaskStatus::Running)
            .with_progress(0.25);
        store.update_record(&record).await.unwrap();

        let found = store.record_for_id("task-1").await.unwrap().unwrap();
        assert_eq!(found, record);
    }

    #[tokio::test]
    async fn test_record_for_missing_id_is_none() {
        let (store, _temp_dir) = create_test_store().await;
        assert!(store.record_for_id("missing").await.unwrap().is_none());
        assert!(store.all_records(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ids_with_illegal_characters_round_trip() {
        let (store, temp_dir) = create_test_store().await;

        let record = create_test_record("https://host/a?b", "default", Utc::now());
        store.update_record(&record).await.unwrap();

        let found = store.record_for_id("https://host/a?b").await.unwrap().unwrap();
        assert_eq!(found.task_id(), "https://host/a?b");
        assert!(
            temp_dir
                .path()
                .join(DEFAULT_COLLECTION)
                .join("https___host_a_b.json")
                .exists()
        );

        store.delete_record_with_id("https://host/a?b").await.unwrap();
        assert!(store.record_for_id("https://host/a?b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_all_records_of_group_keeps_others() {
        let (store, _temp_dir) = create_test_store().await;

        store
            .update_record(&create_test_record("a-1", "A", Utc::now()))
            .await
            .unwrap();
        store
            .update_record(&create_test_record("a-2", "A", Utc::now()))
            .await
            .unwrap();
        store
            .update_record(&create_test_record("b-1", "B", Utc::now()))
            .await
            .unwrap();

        store.delete_all_records(Some("A")).await.unwrap();

        let remaining = store.all_records(None).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].task_id(), "b-1");

        store.delete_all_records(None).await.unwrap();
        assert!(store.all_records(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_collections_do_not_share_records() {
        let temp_dir = TempDir::new().unwrap();
        let storage: Arc<dyn DocumentStore> =
            Arc::new(DirDocumentStore::new(temp_dir.path()).await.unwrap());
        let live: RecordStore<DownloadTask> = RecordStore::new(Arc::clone(&storage));
        let archive: RecordStore<DownloadTask> = RecordStore::with_collection(storage, "archive");

        live.update_record(&create_test_record("t", "default", Utc::now()))
            .await
            .unwrap();

        assert_eq!(archive.collection(), "archive");
        assert!(archive.record_for_id("t").await.unwrap().is_none());
        assert!(live.record_for_id("t").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_open_memory_backend() {
        let config = StoreConfig {
            backend: StoreBackend::Memory,
            collection: "records".to_string(),
            ..StoreConfig::default()
        };
        let store: RecordStore<DownloadTask> = RecordStore::open(&config).await.unwrap();
        let shared = store.clone();

        store
            .update_record(&create_test_record("t", "default", Utc::now()))
            .await
            .unwrap();
        assert_eq!(shared.collection(), "records");
        assert!(shared.record_for_id("t").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_open_rejects_collection_outside_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        for collection in ["..", "", "a/b"] {
            let config = StoreConfig {
                base_dir: Some(temp_dir.path().join("store")),
                collection: collection.to_string(),
                ..StoreConfig::default()
            };
            let err = RecordStore::<DownloadTask>::open(&config).await.err().unwrap();
            assert!(err.is_config(), "{collection:?}");
        }
    }

    #[tokio::test]
    async fn test_open_dir_backend_uses_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = StoreConfig {
            base_dir: Some(temp_dir.path().join("store")),
            ..StoreConfig::default()
        };
        let store: RecordStore<DownloadTask> = RecordStore::open(&config).await.unwrap();
        store
            .update_record(&create_test_record("t", "default", Utc::now()))
            .await
            .unwrap();

        assert!(
            temp_dir
                .path()
                .join("store")
                .join(DEFAULT_COLLECTION)
                .join("t.json")
                .exists()
        );
    }
}
