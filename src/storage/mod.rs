//! Durable Record Storage
//!
//! The store persists two independent text records under fixed keys.
//! Backends implement [`RecordStorage`]; the codec in [`records`] turns
//! those records into a [`RootState`](crate::quest::RootState) and back.

use std::future::Future;

use crate::error::StorageError;

pub mod memory;
pub mod records;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use records::{load_state, save_state, CHAINS_KEY, STATS_KEY};
pub use sqlite::SqliteStorage;

/// Key/value storage for persisted text records
pub trait RecordStorage: Send + Sync {
    /// Read a record, `None` if it was never written
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Write a record, replacing any previous value
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}
