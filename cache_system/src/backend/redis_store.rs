//! Redis cache backend
//!
//! Entries are stored as a JSON envelope (`{"value": .., "stale": ..}`) with
//! `SET EX`; marking stale rewrites the envelope with `KEEPTTL`.

use super::{CacheBackend, CacheEntry};
use crate::errors::CacheError;
use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Redis-based cache backend
#[derive(Clone)]
pub struct RedisBackend {
    client: Arc<Client>,
    connection_pool: Arc<RwLock<Option<redis::aio::MultiplexedConnection>>>,
}

impl Debug for RedisBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let connection_status = match self.connection_pool.try_read() {
            Ok(pool) => {
                if pool.is_some() {
                    "connected"
                } else {
                    "no_connection"
                }
            }
            Err(_) => "lock_error",
        };

        f.debug_struct("RedisBackend")
            .field("connected", &connection_status)
            .finish()
    }
}

impl RedisBackend {
    /// Create a backend; the connection is opened lazily on first use
    pub fn new(redis_url: &str) -> Result<Self, CacheError> {
        let client = Client::open(redis_url)?;

        Ok(Self {
            client: Arc::new(client),
            connection_pool: Arc::new(RwLock::new(None)),
        })
    }

    /// Get or create Redis connection
    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection, CacheError> {
        let mut pool = self.connection_pool.write().await;

        if pool.is_none() {
            let connection = self.client.get_multiplexed_async_connection().await?;
            *pool = Some(connection);
        }

        Ok(pool
            .as_ref()
            .ok_or_else(|| CacheError::Connection("Failed to get connection from pool".into()))?
            .clone())
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let mut conn = self.get_connection().await?;
        let cached: Option<String> = conn.get(key).await?;

        match cached {
            Some(json_str) => Ok(Some(serde_json::from_str(&json_str)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, entry: CacheEntry, ttl: Duration) -> Result<(), CacheError> {
        let json_str = serde_json::to_string(&entry)?;
        let mut conn = self.get_connection().await?;

        // EX 0 is rejected by redis
        let seconds = ttl.as_secs().max(1);
        let _: () = conn.set_ex(key, &json_str, seconds).await?;
        Ok(())
    }

    async fn mark_stale(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.get_connection().await?;
        let cached: Option<String> = conn.get(key).await?;

        let Some(json_str) = cached else {
            return Ok(false);
        };

        let mut entry: CacheEntry = serde_json::from_str(&json_str)?;
        if entry.stale {
            return Ok(true);
        }
        entry.stale = true;

        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(serde_json::to_string(&entry)?)
            .arg("KEEPTTL")
            .query_async(&mut conn)
            .await?;
        Ok(true)
    }

    async fn remove(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.get_connection().await?;
        let deleted: i32 = conn.del(key).await?;
        Ok(deleted > 0)
    }

    async fn clear(&self, prefix: &str) -> Result<usize, CacheError> {
        let pattern = format!("{}*", prefix);
        let mut conn = self.get_connection().await?;

        let keys: Vec<String> = conn.keys(&pattern).await?;
        if keys.is_empty() {
            return Ok(0);
        }

        let deleted: i32 = conn.del(keys).await?;
        Ok(deleted.max(0) as usize)
    }

    async fn health_check(&self) -> Result<(), CacheError> {
        let mut conn = self.get_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
