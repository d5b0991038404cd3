//! Error types for durable storage.

use thiserror::Error;

/// Errors from reading or writing persisted records.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
