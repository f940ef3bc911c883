//! Task capability trait and the reference download task.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;

/// Group assigned to tasks that do not choose one.
pub const DEFAULT_GROUP: &str = "default";

/// The capability a task definition must provide to be tracked.
///
/// The task engine owns the concrete type. Serialization goes through serde
/// and must produce a JSON object; its keys are merged with the tracking
/// fields of a `TaskRecord`, so a task must not serialize any of
/// [`RESERVED_KEYS`](crate::record::RESERVED_KEYS) itself.
pub trait Task: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Unique identifier chosen by the task engine.
    fn task_id(&self) -> &str;

    /// Caller-chosen partition used for bulk query and delete.
    fn group(&self) -> &str;

    /// When the task was created.
    fn creation_time(&self) -> DateTime<Utc>;
}

/// A file download handled by the downloader.
///
/// Serialized with camelCase keys; `creationTime` is stored as milliseconds
/// since the Unix epoch, and the builders truncate it to that precision so a
/// stored task compares equal to the one that was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadTask {
    pub task_id: String,
    pub url: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub directory: String,
    #[serde(default = "default_group")]
    pub group: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub metadata: String,
    #[serde(default)]
    pub retries: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub creation_time: DateTime<Utc>,
}

fn default_group() -> String {
    DEFAULT_GROUP.to_string()
}

impl DownloadTask {
    /// Creates a task in the default group, created now.
    pub fn new(task_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            url: url.into(),
            filename: String::new(),
            directory: String::new(),
            group: default_group(),
            headers: BTreeMap::new(),
            metadata: String::new(),
            retries: 0,
            creation_time: Utc::now().trunc_subsecs(3),
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_creation_time(mut self, creation_time: DateTime<Utc>) -> Self {
        self.creation_time = creation_time.trunc_subsecs(3);
        self
    }
}

impl Task for DownloadTask {
    fn task_id(&self) -> &str {
        &self.task_id
    }

    fn group(&self) -> &str {
        &self.group
    }

    fn creation_time(&self) -> DateTime<Utc> {
        self.creation_time
    }
}
