//! Cache-aside manager over the configured backend.
//!
//! Every backend failure stops here: reads degrade to a miss and writes to a
//! no-op, so a total store outage only means "always recompute". The one error
//! that does escape is the caller's own recomputation failure.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cache::memory::MemoryStore;
use crate::cache::noop::NoOpStore;
use crate::cache::policy::resolve_ttl;
use crate::cache::redis::RedisStore;
use crate::cache::{CacheError, CacheStore, ConnectionState};
use crate::config::settings::{CacheBackend, CacheConfig};

#[derive(Default)]
struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    errors: AtomicU64,
}

/// Snapshot of cache counters since startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Backend or decode failures absorbed by the fail-open path.
    pub errors: u64,
}

/// Handle to the process-wide cache.
///
/// Cloning is cheap; all clones share one backend and therefore one connection.
#[derive(Clone)]
pub struct CacheManager {
    backend: Arc<dyn CacheStore>,
    counters: Arc<CacheCounters>,
}

impl CacheManager {
    /// Create a manager for the configured backend.
    ///
    /// No connection is made here; a Redis backend connects on first use.
    pub fn new(config: &CacheConfig) -> Self {
        let backend: Arc<dyn CacheStore> = if !config.enabled {
            Arc::new(NoOpStore::new())
        } else {
            match config.backend {
                CacheBackend::Memory => Arc::new(MemoryStore::new(&config.memory)),
                CacheBackend::Redis => Arc::new(RedisStore::new(&config.redis)),
            }
        };

        Self::with_store(backend)
    }

    /// Create a manager over an explicit backend.
    pub fn with_store(backend: Arc<dyn CacheStore>) -> Self {
        Self {
            backend,
            counters: Arc::new(CacheCounters::default()),
        }
    }

    /// Name of the active backend.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Connection state of the active backend.
    pub fn state(&self) -> ConnectionState {
        self.backend.state()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            errors: self.counters.errors.load(Ordering::Relaxed),
        }
    }

    /// Run a backend operation, converting any failure into `None`.
    async fn fail_open<T, Fut>(&self, operation: &'static str, key: &str, op: Fut) -> Option<T>
    where
        Fut: Future<Output = Result<T, CacheError>>,
    {
        let result = if key.is_empty() {
            Err(CacheError::InvalidKey(key.to_string()))
        } else {
            op.await
        };

        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.counters.errors.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    operation,
                    key,
                    backend = self.backend.name(),
                    error = %e,
                    "Cache operation failed, continuing without cache"
                );
                None
            }
        }
    }

    /// Get a cached value. Absent, expired, unreadable, or undecodable all read as `None`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let backend = &self.backend;
        let value = self
            .fail_open("get", key, async {
                let decoded = match backend.get(key).await? {
                    Some(raw) => Some(serde_json::from_str::<T>(&raw)?),
                    None => None,
                };
                Ok::<_, CacheError>(decoded)
            })
            .await
            .flatten();

        let counter = if value.is_some() {
            &self.counters.hits
        } else {
            &self.counters.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);

        value
    }

    /// Store a value, overwriting any existing entry.
    ///
    /// The lifetime is `ttl_seconds` when given, else derived from the key prefix.
    /// An explicit lifetime of zero stores nothing.
    pub async fn set<T>(&self, key: &str, value: &T, ttl_seconds: Option<u64>)
    where
        T: Serialize + Sync + ?Sized,
    {
        let ttl = resolve_ttl(key, ttl_seconds);
        if ttl == 0 {
            tracing::debug!(key, "Zero TTL requested, value not cached");
            return;
        }

        let encoded = serde_json::to_string(value).map_err(CacheError::from);
        let backend = &self.backend;
        self.fail_open("set", key, async move {
            match encoded {
                Ok(raw) => backend.set(key, raw, ttl).await,
                Err(e) => Err(e),
            }
        })
        .await;
    }

    /// Remove an entry. Removing an absent key is not an error.
    pub async fn delete(&self, key: &str) {
        let backend = &self.backend;
        self.fail_open("delete", key, async move { backend.remove(key).await })
            .await;
    }

    /// Return the cached value for `key`, or compute, cache, and return it.
    ///
    /// `recompute` is never called on a hit. Its error is returned unchanged
    /// and nothing is cached. Concurrent misses on the same key are not
    /// coalesced: each caller recomputes and the last write wins.
    pub async fn compute_if_absent<T, E, F, Fut>(
        &self,
        key: &str,
        ttl_seconds: Option<u64>,
        recompute: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.get::<T>(key).await {
            tracing::debug!(key, "Cache hit");
            return Ok(cached);
        }

        tracing::debug!(key, "Cache miss");
        let fresh = match recompute().await {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(key, "Recompute failed, nothing cached");
                return Err(e);
            }
        };

        self.set(key, &fresh, ttl_seconds).await;
        Ok(fresh)
    }

    /// Release backend connections. Best effort.
    pub async fn shutdown(&self) {
        tracing::info!(backend = self.backend.name(), "Shutting down cache");
        self.backend.shutdown().await;
    }
}
