//! Document store backends.

mod dir_store;
mod memory_store;

pub use dir_store::DirDocumentStore;
pub use memory_store::InMemoryDocumentStore;
