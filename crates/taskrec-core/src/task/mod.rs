//! Task domain module.
//!
//! The task engine owns task definitions; this crate only needs the small
//! capability surface exposed by [`Task`] plus the tracking value types that
//! are stored next to each task.
//!
//! # Module Structure
//!
//! - `model`: the `Task` capability trait and the `DownloadTask` reference type
//! - `status`: `TaskStatus`, persisted by ordinal
//! - `exception`: `TaskException`, the terminal failure description
//!
//! # Usage
//!
//! ```ignore
//! use taskrec_core::task::{DownloadTask, Task, TaskException, TaskStatus};
//! ```

mod exception;
mod model;
mod status;

// Re-export public API
pub use exception::{TaskException, TaskExceptionKind};
pub use model::{DEFAULT_GROUP, DownloadTask, Task};
pub use status::TaskStatus;
