//! Cache error types.

use thiserror::Error;

/// Errors that can occur when using the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to open the store.
    #[error("Failed to open store: {0}")]
    OpenError(String),

    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// Underlying file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
