//! Storage interfaces.
//!
//! Two seams, mirroring the layering of the rest of the crate:
//!
//! - [`DocumentStore`]: a generic store of flat JSON documents grouped into
//!   named collections. Supplied by the infrastructure layer.
//! - [`RecordRepository`]: the task record API the task engine depends on,
//!   implemented on top of a `DocumentStore`.

use async_trait::async_trait;
use chrono::Duration;

use crate::error::Result;
use crate::record::{Document, TaskRecord};
use crate::task::Task;

/// A store of flat JSON documents keyed by string within named collections.
///
/// Implementations must make each single-document operation atomic. Keys are
/// already sanitized by the caller. There is no cross-document transaction.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Loads one document.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Document))`: Document found
    /// - `Ok(None)`: No document under this key
    /// - `Err(_)`: Storage failure or unreadable document
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>>;

    /// Loads every document of a collection, in storage order.
    ///
    /// A missing collection yields an empty list.
    async fn get_all(&self, collection: &str) -> Result<Vec<Document>>;

    /// Writes a document, replacing any existing one under the same key.
    async fn set(&self, collection: &str, key: &str, document: &Document) -> Result<()>;

    /// Deletes one document. Deleting a missing key succeeds.
    async fn delete(&self, collection: &str, key: &str) -> Result<()>;

    /// Deletes a whole collection. Deleting a missing collection succeeds.
    async fn delete_all(&self, collection: &str) -> Result<()>;
}

/// Durable tracking state for tasks, one record per task id.
///
/// Every id passed in is sanitized before it reaches storage (see
/// [`crate::key::sanitize_key`]). Multi-id operations run one id at a time
/// and are not atomic; every operation is safe to retry.
#[async_trait]
pub trait RecordRepository<T: Task>: Send + Sync {
    /// Lists all records, optionally limited to one group.
    ///
    /// Order follows the underlying store and is not stable.
    async fn all_records(&self, group: Option<&str>) -> Result<Vec<TaskRecord<T>>>;

    /// Lists records whose task was created more than `age` ago.
    ///
    /// The current time is sampled once per call.
    async fn all_records_older_than(
        &self,
        age: Duration,
        group: Option<&str>,
    ) -> Result<Vec<TaskRecord<T>>>;

    /// Finds the record for a task id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(TaskRecord))`: Record found
    /// - `Ok(None)`: No record for this id
    /// - `Err(_)`: Storage failure or corrupt record
    async fn record_for_id(&self, task_id: &str) -> Result<Option<TaskRecord<T>>>;

    /// Finds the records for several ids, keeping input order and skipping
    /// ids without a record.
    async fn records_for_ids(&self, task_ids: &[String]) -> Result<Vec<TaskRecord<T>>>;

    /// Deletes every record, or every record of one group.
    ///
    /// Group-scoped deletion reads the group first and then deletes each
    /// record; records added meanwhile may survive.
    async fn delete_all_records(&self, group: Option<&str>) -> Result<()>;

    /// Deletes the record for a task id. Missing records are not an error.
    async fn delete_record_with_id(&self, task_id: &str) -> Result<()>;

    /// Deletes the records for several ids in order. Deletions that already
    /// happened stay in place if a later one fails.
    async fn delete_records_with_ids(&self, task_ids: &[String]) -> Result<()>;

    /// Writes a record, fully replacing any previous record for its task id.
    async fn update_record(&self, record: &TaskRecord<T>) -> Result<()>;
}
