//! Durable key-value storage for user preferences.
//!
//! Components never touch storage directly; they receive an
//! `Arc<dyn KeyValueStore>` so tests can substitute [`MemoryStore`] for the
//! on-disk [`FileStore`].

pub mod file;
pub mod memory;

use async_trait::async_trait;
use storyreel_core::error::CoreError;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<StoreError> for CoreError {
    fn from(e: StoreError) -> Self {
        CoreError::Internal(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// String-keyed, string-valued storage. Last write wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Absent keys are `Ok(None)`.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete a value. Deleting an absent key is a no-op.
    async fn remove(&self, key: &str) -> StoreResult<()>;
}
