//! NoOp cache backend.
//!
//! Used when caching is disabled. Every read misses and every write is dropped.

use async_trait::async_trait;

use crate::cache::{CacheError, CacheStore};

/// A store that never stores anything.
///
/// Used when `cache.enabled = false` in configuration.
pub struct NoOpStore;

impl NoOpStore {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for NoOpStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: String, _ttl_seconds: u64) -> Result<(), CacheError> {
        Ok(())
    }

    async fn remove(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
