pub mod error;
pub mod key;
pub mod record;
pub mod store;
pub mod task;

// Re-export common types
pub use error::{Result, TaskrecError};
pub use record::{Document, TaskRecord};
pub use store::{DocumentStore, RecordRepository};
pub use task::{DownloadTask, Task, TaskException, TaskExceptionKind, TaskStatus};
