//! Cache-aside layer with prefix-classified TTLs and fail-open semantics.
//!
//! Callers build a namespaced key and hand [`CacheManager::compute_if_absent`]
//! the computation to memoize. The lifetime of a stored entry is chosen from
//! the key's prefix (see [`policy`]) unless the caller overrides it, and a
//! failing backend only ever costs a recomputation.
//!
//! # Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! backend = "redis"  # or "memory"
//!
//! [cache.memory]
//! max_size = 10000
//!
//! [cache.redis]
//! url = "redis://127.0.0.1:6379"
//! pool_size = 8
//! connection_timeout = 5
//! key_prefix = ""
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let key = cache_key!("repo", owner, name);
//! let repo = cache
//!     .compute_if_absent(&key, None, || provider.get_repository(owner, name))
//!     .await?;
//! ```

mod error;
pub mod key;
#[macro_use]
mod macros;
mod manager;
mod memory;
mod noop;
pub mod policy;
mod redis;
mod traits;

pub use error::CacheError;
pub use key::build_key;
pub use manager::{CacheManager, CacheStats};
pub use memory::MemoryStore;
pub use noop::NoOpStore;
pub use policy::{IMPLEMENTATION_GUIDE_TTL, KeyClass, SEARCH_RESULTS_TTL, resolve_ttl, ttl_for_key};
pub use redis::RedisStore;
pub use traits::{CacheStore, ConnectionState};

// Re-export config types
pub use crate::config::settings::{CacheBackend, CacheConfig, MemoryCacheConfig, RedisCacheConfig};
