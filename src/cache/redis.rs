//! Redis cache backend using a lazily initialized bb8 connection pool.
//!
//! Nothing touches the network at construction. The first operation creates
//! the pool without connecting; connections are opened on checkout. A failed
//! checkout leaves the store `Errored` and the next operation tries again.

use std::borrow::Cow;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bb8::{Pool, PooledConnection};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, RedisError};
use tokio::sync::RwLock;

use crate::cache::{CacheError, CacheStore, ConnectionState};
use crate::config::settings::RedisCacheConfig;

type RedisPool = Pool<Client>;

/// Redis-backed store.
pub struct RedisStore {
    /// Parse errors are kept and reported per operation instead of at startup.
    client: Result<Client, String>,
    pool: RwLock<Option<RedisPool>>,
    state: AtomicU8,
    key_prefix: String,
    pool_size: u32,
    connection_timeout: Duration,
    pools_created: AtomicUsize,
}

impl RedisStore {
    pub fn new(config: &RedisCacheConfig) -> Self {
        let client = Client::open(config.url.as_str()).map_err(|e| e.to_string());
        if let Err(ref error) = client {
            tracing::warn!(error = %error, "Invalid Redis URL, cache will always miss");
        }

        Self {
            client,
            pool: RwLock::new(None),
            state: AtomicU8::new(ConnectionState::Uninitialized.as_u8()),
            key_prefix: config.key_prefix.clone(),
            pool_size: config.pool_size.max(1),
            connection_timeout: Duration::from_secs(config.connection_timeout.max(1)),
            pools_created: AtomicUsize::new(0),
        }
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }

    /// Move to `state` unless the store has been shut down.
    fn transition(&self, state: ConnectionState) {
        let closed = ConnectionState::Closed.as_u8();
        let _ = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (current != closed).then_some(state.as_u8())
            });
    }

    /// `Uninitialized` or `Errored` become `Connecting`; other states are kept.
    fn mark_connecting(&self) {
        for from in [ConnectionState::Uninitialized, ConnectionState::Errored] {
            let swapped = self.state.compare_exchange(
                from.as_u8(),
                ConnectionState::Connecting.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            );
            if swapped.is_ok() {
                return;
            }
        }
    }

    fn prefixed_key<'a>(&self, key: &'a str) -> Cow<'a, str> {
        if self.key_prefix.is_empty() {
            Cow::Borrowed(key)
        } else {
            Cow::Owned(format!("{}:{}", self.key_prefix, key))
        }
    }

    /// Return the shared pool, creating it on first use.
    ///
    /// Creating the pool performs no I/O, so the write lock is only held for
    /// the double check. Connections are opened by [`checkout`](Self::checkout),
    /// where each caller waits at most `connection_timeout` on its own.
    async fn pool(&self) -> Result<RedisPool, CacheError> {
        if self.state() == ConnectionState::Closed {
            return Err(CacheError::Closed);
        }

        if let Some(pool) = self.pool.read().await.as_ref() {
            return Ok(pool.clone());
        }

        let client = self.client.clone().map_err(|e| {
            self.transition(ConnectionState::Errored);
            CacheError::Connection(e)
        })?;

        let mut slot = self.pool.write().await;
        if let Some(pool) = slot.as_ref() {
            return Ok(pool.clone());
        }
        if self.state() == ConnectionState::Closed {
            return Err(CacheError::Closed);
        }

        tracing::debug!(pool_size = self.pool_size, "Creating Redis connection pool");
        let pool = Pool::builder()
            .max_size(self.pool_size)
            .connection_timeout(self.connection_timeout)
            .build_unchecked(client);
        self.pools_created.fetch_add(1, Ordering::Relaxed);

        *slot = Some(pool.clone());
        Ok(pool)
    }

    async fn checkout<'p>(
        &self,
        pool: &'p RedisPool,
    ) -> Result<PooledConnection<'p, Client>, CacheError> {
        if self.state() != ConnectionState::Ready {
            self.mark_connecting();
        }

        match pool.get().await {
            Ok(conn) => {
                if self.state() != ConnectionState::Ready {
                    tracing::info!("Redis connection established");
                }
                self.transition(ConnectionState::Ready);
                Ok(conn)
            }
            Err(e) => {
                self.transition(ConnectionState::Errored);
                Err(CacheError::Connection(e.to_string()))
            }
        }
    }

    /// Record the outcome of a command against the connection state.
    fn track<T>(&self, result: Result<T, RedisError>) -> Result<T, CacheError> {
        match result {
            Ok(value) => {
                self.transition(ConnectionState::Ready);
                Ok(value)
            }
            Err(e) => {
                if e.is_io_error() || e.is_connection_dropped() || e.is_timeout() {
                    self.transition(ConnectionState::Errored);
                    Err(CacheError::Connection(e.to_string()))
                } else {
                    Err(CacheError::Operation(e.to_string()))
                }
            }
        }
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let pool = self.pool().await?;
        let mut conn = self.checkout(&pool).await?;
        let prefixed = self.prefixed_key(key);

        let conn_ref: &mut MultiplexedConnection = &mut conn;
        let result: Result<Option<String>, RedisError> = conn_ref.get(prefixed.as_ref()).await;
        self.track(result)
    }

    async fn set(&self, key: &str, value: String, ttl_seconds: u64) -> Result<(), CacheError> {
        let pool = self.pool().await?;
        let mut conn = self.checkout(&pool).await?;
        let prefixed = self.prefixed_key(key);

        let conn_ref: &mut MultiplexedConnection = &mut conn;
        let result = conn_ref
            .set_ex::<_, _, ()>(prefixed.as_ref(), value, ttl_seconds)
            .await;
        self.track(result)
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        let pool = self.pool().await?;
        let mut conn = self.checkout(&pool).await?;
        let prefixed = self.prefixed_key(key);

        let conn_ref: &mut MultiplexedConnection = &mut conn;
        let result = conn_ref.del::<_, ()>(prefixed.as_ref()).await;
        self.track(result)
    }

    fn name(&self) -> &'static str {
        "redis"
    }

    fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    async fn shutdown(&self) {
        self.set_state(ConnectionState::Closed);
        if self.pool.write().await.take().is_some() {
            tracing::info!("Redis connection pool released");
        }
    }
}
