//! Local key-value storage abstraction for project persistence.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryKv;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileKv;

use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A synchronous string key-value store.
///
/// The persistence collaborator is local and always available, so the
/// interface is synchronous: no timeouts, no retries. Values are opaque to
/// the store; the project session writes JSON documents.
pub trait KvStore: Send + Sync {
    /// Read the value under a key, `None` when absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write (or overwrite) the value under a key.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a key. Removing an absent key is a no-op.
    fn remove(&self, key: &str) -> StorageResult<()>;
}
