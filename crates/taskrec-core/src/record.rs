//! Task record domain model.
//!
//! A `TaskRecord` is persisted as a single flat JSON object: the task's own
//! fields with the tracking fields (`status`, `progress`, `exception`)
//! written on top of them. Encoding builds the task's map first and then
//! overwrites the reserved keys; decoding removes the reserved keys first and
//! hands the remainder to the task's deserializer.

use serde_json::{Map, Number, Value};

use crate::error::{Result, TaskrecError};
use crate::task::{Task, TaskException, TaskStatus};

/// A flat string-keyed JSON document, the unit the document store persists.
pub type Document = Map<String, Value>;

pub const STATUS_KEY: &str = "status";
pub const PROGRESS_KEY: &str = "progress";
pub const EXCEPTION_KEY: &str = "exception";

/// Keys owned by the record. A task serializing any of these loses them on
/// round-trip.
pub const RESERVED_KEYS: [&str; 3] = [STATUS_KEY, PROGRESS_KEY, EXCEPTION_KEY];

/// Persisted snapshot of a task's tracking state.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord<T: Task> {
    pub task: T,
    pub status: TaskStatus,
    /// Fractional completion, normally in `0.0..=1.0`.
    pub progress: f64,
    /// Present only when the task ended in a failure state.
    pub exception: Option<TaskException>,
}

impl<T: Task> TaskRecord<T> {
    /// Creates a record in the initial state: enqueued, no progress, no exception.
    pub fn new(task: T) -> Self {
        Self {
            task,
            status: TaskStatus::default(),
            progress: 0.0,
            exception: None,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_exception(mut self, exception: TaskException) -> Self {
        self.exception = Some(exception);
        self
    }

    pub fn task_id(&self) -> &str {
        self.task.task_id()
    }

    pub fn group(&self) -> &str {
        self.task.group()
    }

    /// Encodes the record as one flat document.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the task does not serialize to a
    /// JSON object, or if `progress` is NaN or infinite.
    pub fn to_document(&self) -> Result<Document> {
        let mut document = match serde_json::to_value(&self.task)? {
            Value::Object(map) => map,
            other => {
                return Err(TaskrecError::json(format!(
                    "task '{}' must serialize to a JSON object, got {}",
                    self.task_id(),
                    value_kind(&other)
                )));
            }
        };

        document.insert(STATUS_KEY.to_string(), Value::from(self.status.ordinal()));
        let progress = Number::from_f64(self.progress).ok_or_else(|| {
            TaskrecError::json(format!(
                "task '{}' has non-finite progress {}",
                self.task_id(),
                self.progress
            ))
        })?;
        document.insert(PROGRESS_KEY.to_string(), Value::Number(progress));
        let exception = match &self.exception {
            Some(exception) => serde_json::to_value(exception)?,
            None => Value::Null,
        };
        document.insert(EXCEPTION_KEY.to_string(), exception);

        Ok(document)
    }

    /// Decodes a record from a flat document.
    ///
    /// Missing or `null` tracking fields take their defaults (status ordinal
    /// 0, progress 0.0, no exception). Fields that are present but malformed
    /// are errors.
    pub fn from_document(mut document: Document) -> Result<Self> {
        let status = match document.remove(STATUS_KEY) {
            None | Some(Value::Null) => TaskStatus::default(),
            Some(value) => {
                let ordinal = value.as_u64().ok_or_else(|| {
                    TaskrecError::json(format!(
                        "'{}' must be a non-negative integer, got {}",
                        STATUS_KEY, value
                    ))
                })?;
                TaskStatus::from_ordinal(ordinal)?
            }
        };

        let progress = match document.remove(PROGRESS_KEY) {
            None | Some(Value::Null) => 0.0,
            Some(value) => value.as_f64().ok_or_else(|| {
                TaskrecError::json(format!("'{}' must be a number, got {}", PROGRESS_KEY, value))
            })?,
        };

        let exception = match document.remove(EXCEPTION_KEY) {
            None | Some(Value::Null) => None,
            Some(value) => Some(serde_json::from_value::<TaskException>(value)?),
        };

        let task: T = serde_json::from_value(Value::Object(document))?;

        Ok(Self {
            task,
            status,
            progress,
            exception,
        })
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
