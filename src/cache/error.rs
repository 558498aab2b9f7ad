//! Cache error types.

use thiserror::Error;

/// Errors that can occur during cache operations.
///
/// None of these ever reach a caller of [`CacheManager`](super::CacheManager):
/// the manager logs them and degrades to a miss or a no-op.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache operation failed: {0}")]
    Operation(String),

    #[error("Cache connection failed: {0}")]
    Connection(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid cache key: {0:?}")]
    InvalidKey(String),

    #[error("Cache backend has been shut down")]
    Closed,
}

impl From<serde_json::Error> for CacheError {
    fn from(error: serde_json::Error) -> Self {
        CacheError::Serialization(error.to_string())
    }
}
