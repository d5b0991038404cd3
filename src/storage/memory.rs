//! In-memory record storage, for tests and for running without a database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::RecordStorage;
use crate::error::StorageError;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: Mutex<HashMap<String, String>>,
    /// When set, every read and write fails
    unavailable: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage pre-populated with records
    pub fn with_records<'a>(records: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let storage = Self::new();
        if let Ok(mut map) = storage.records.lock() {
            for (key, value) in records {
                map.insert(key.to_string(), value.to_string());
            }
        }
        storage
    }

    /// Simulate storage going away (quota exceeded, disk removed)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Current raw value of a record
    pub fn raw(&self, key: &str) -> Option<String> {
        self.records.lock().ok()?.get(key).cloned()
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("memory storage disabled".to_string()));
        }
        Ok(())
    }
}

impl RecordStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_available()?;
        let records = self
            .records
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(records.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_available()?;
        let mut records = self
            .records
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        records.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
