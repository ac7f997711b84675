//! Typed wrapper over the shared cache (component A).
//!
//! Every operation is deadline-bounded by the caller via `tokio::time::timeout`
//! at the orchestrator layer; this module only talks to Redis. Transport
//! errors are returned as `CacheError`, never panicked on — callers decide
//! whether to treat them as a miss (read path) or surface them (health probe).

use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    Connection(#[from] redis::RedisError),
}

/// A degraded flag is not tracked here: the health probe calls [`CacheClient::ping`]
/// directly rather than consulting cached state, since `ConnectionManager`
/// already reconnects transparently between calls.
#[derive(Clone)]
pub struct CacheClient {
    conn: ConnectionManager,
}

impl CacheClient {
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self { conn })
    }

    /// `Ok(None)` on cache miss, `Ok(Some(bytes))` on hit, `Err` on transport failure.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }

    pub async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let ttl_secs = ttl.as_secs().max(1);
        let _: () = conn.set_ex(key, value, ttl_secs).await?;
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
