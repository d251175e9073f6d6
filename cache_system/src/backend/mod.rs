//! Cache storage backends
//!
//! A backend stores JSON entries under rendered string keys with a TTL and a
//! stale flag. The manager owns the freshness rules.

pub mod memory;
pub mod redis_store;

pub use self::memory::MemoryBackend;
pub use self::redis_store::RedisBackend;

use crate::errors::CacheError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;

/// Stored value plus its stale mark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub value: serde_json::Value,
    pub stale: bool,
}

impl CacheEntry {
    pub fn fresh(value: serde_json::Value) -> Self {
        Self { value, stale: false }
    }
}

#[async_trait]
pub trait CacheBackend: Send + Sync + Debug {
    /// Entry under the key, `None` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError>;

    /// Store an entry, replacing any previous one, for `ttl`
    async fn put(&self, key: &str, entry: CacheEntry, ttl: Duration) -> Result<(), CacheError>;

    /// Flag an existing entry stale, keeping its value and TTL.
    /// Returns whether an entry was present.
    async fn mark_stale(&self, key: &str) -> Result<bool, CacheError>;

    /// Drop an entry. Returns whether one was present.
    async fn remove(&self, key: &str) -> Result<bool, CacheError>;

    /// Drop every entry whose key starts with `prefix`
    async fn clear(&self, prefix: &str) -> Result<usize, CacheError>;

    /// Check the backend is reachable
    async fn health_check(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
