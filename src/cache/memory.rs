//! In-process cache backend with per-entry expiry.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::cache::{CacheError, CacheStore};
use crate::config::settings::MemoryCacheConfig;

/// Longest lifetime an entry can have; larger TTLs are capped to it.
const MAX_TTL_SECONDS: u64 = 100 * 365 * 24 * 60 * 60;

struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

impl MemoryEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-memory store bounded by entry count.
///
/// Expired entries read as absent and are dropped on access. When full, an
/// insert first drops expired entries, then the entry closest to expiry.
pub struct MemoryStore {
    entries: DashMap<String, MemoryEntry>,
    max_size: usize,
}

impl MemoryStore {
    pub fn new(config: &MemoryCacheConfig) -> Self {
        Self::with_capacity(config.max_size)
    }

    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_size: max_size.max(1),
        }
    }

    /// Number of live and not-yet-collected entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn make_room(&self, now: Instant) {
        self.entries.retain(|_, entry| !entry.is_expired(now));
        if self.entries.len() < self.max_size {
            return;
        }

        let victim = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().expires_at)
            .map(|entry| entry.key().clone());
        if let Some(key) = victim {
            self.entries.remove(&key);
        }
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                return Ok(Some(entry.value.clone()));
            }
        }
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        Ok(None)
    }

    async fn set(&self, key: &str, value: String, ttl_seconds: u64) -> Result<(), CacheError> {
        let now = Instant::now();
        if !self.entries.contains_key(key) && self.entries.len() >= self.max_size {
            self.make_room(now);
        }

        let entry = MemoryEntry {
            value,
            expires_at: now + Duration::from_secs(ttl_seconds.min(MAX_TTL_SECONDS)),
        };
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let store = MemoryStore::with_capacity(10);
        store.set("repo:a:b", "{\"a\":1}".into(), 60).await.unwrap();
        assert_eq!(
            store.get("repo:a:b").await.unwrap().as_deref(),
            Some("{\"a\":1}")
        );
    }

    #[tokio::test]
    async fn test_missing_key_is_absent() {
        let store = MemoryStore::with_capacity(10);
        assert!(store.get("nothing:here").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_zero_ttl_expires_immediately() {
        let store = MemoryStore::with_capacity(10);
        store.set("issue:1", "1".into(), 0).await.unwrap();
        assert!(store.get("issue:1").await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemoryStore::with_capacity(10);
        store.set("user:1", "\"old\"".into(), 60).await.unwrap();
        store.set("user:1", "\"new\"".into(), 60).await.unwrap();
        assert_eq!(store.get("user:1").await.unwrap().as_deref(), Some("\"new\""));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let store = MemoryStore::with_capacity(10);
        store.set("repo:a", "1".into(), 60).await.unwrap();
        store.remove("repo:a").await.unwrap();
        store.remove("repo:a").await.unwrap();
        assert!(store.get("repo:a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_capacity_evicts_soonest_expiry() {
        let store = MemoryStore::with_capacity(2);
        store.set("short", "1".into(), 10).await.unwrap();
        store.set("long", "2".into(), 1000).await.unwrap();
        store.set("newest", "3".into(), 500).await.unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.get("short").await.unwrap().is_none());
        assert!(store.get("long").await.unwrap().is_some());
        assert!(store.get("newest").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_huge_ttl_is_capped() {
        let store = MemoryStore::with_capacity(4);
        store.set("repo:a:b", "1".into(), u64::MAX).await.unwrap();
        assert_eq!(store.get("repo:a:b").await.unwrap().as_deref(), Some("1"));
    }
}
