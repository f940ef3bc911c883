pub mod config;
pub mod logging;
pub mod paths;
pub mod record_store;
pub mod storage;

pub use crate::config::{DEFAULT_COLLECTION, StoreBackend, StoreConfig};
pub use crate::record_store::RecordStore;
pub use crate::storage::{DirDocumentStore, InMemoryDocumentStore};
