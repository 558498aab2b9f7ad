//! CacheStore trait definition.

use async_trait::async_trait;

use crate::cache::CacheError;

/// Lifecycle of a backend's connection to its store.
///
/// `Errored` is not terminal: the next operation attempts to reach `Ready` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Uninitialized,
    Connecting,
    Ready,
    Errored,
    Closed,
}

impl ConnectionState {
    pub(crate) fn as_u8(self) -> u8 {
        match self {
            ConnectionState::Uninitialized => 0,
            ConnectionState::Connecting => 1,
            ConnectionState::Ready => 2,
            ConnectionState::Errored => 3,
            ConnectionState::Closed => 4,
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Ready,
            3 => ConnectionState::Errored,
            4 => ConnectionState::Closed,
            _ => ConnectionState::Uninitialized,
        }
    }
}

/// Point operations against a key/value store with TTL eviction.
///
/// Backends report failures as [`CacheError`]; they never swallow them.
/// Values are the serialized text form of the cached payload.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get the stored text for a key, `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store text under a key, expiring after `ttl_seconds`.
    async fn set(&self, key: &str, value: String, ttl_seconds: u64) -> Result<(), CacheError>;

    /// Remove a key. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<(), CacheError>;

    /// Short backend name used in logs and health output.
    fn name(&self) -> &'static str;

    /// Current connection state.
    fn state(&self) -> ConnectionState {
        ConnectionState::Ready
    }

    /// Release any held connections. Best effort.
    async fn shutdown(&self) {}
}
