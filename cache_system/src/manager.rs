//! Cache manager implementation
//!
//! This module provides the CacheManager struct: get-or-fetch reads,
//! invalidation, and invalidation notifications over a pluggable backend.

use crate::backend::{CacheBackend, CacheEntry, MemoryBackend, RedisBackend};
use crate::errors::CacheError;
use crate::key::CacheKey;
use config::{CacheBackendKind, CacheConfig};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;

/// Buffered invalidation notices per subscriber
const INVALIDATION_CHANNEL_CAPACITY: usize = 256;

/// What the cache currently holds for a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Missing,
    Fresh,
    Stale,
}

/// Generation of a key with fetches in flight
#[derive(Debug, Default)]
struct TrackedKey {
    generation: u64,
    in_flight: usize,
}

/// One in-flight fetch; the key stops being tracked when its last fetch ends
struct FetchGuard<'a> {
    generations: &'a Mutex<HashMap<CacheKey, TrackedKey>>,
    key: CacheKey,
    started: u64,
}

impl FetchGuard<'_> {
    /// Was the key invalidated since this fetch started
    fn invalidated(&self) -> bool {
        self.generations
            .lock()
            .map(|generations| {
                generations
                    .get(&self.key)
                    .is_some_and(|tracked| tracked.generation != self.started)
            })
            .unwrap_or(false)
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut generations) = self.generations.lock() {
            if let Some(tracked) = generations.get_mut(&self.key) {
                tracked.in_flight = tracked.in_flight.saturating_sub(1);
                if tracked.in_flight == 0 {
                    generations.remove(&self.key);
                }
            }
        }
    }
}

/// Client-side query cache.
///
/// Every key carries a generation number that invalidation bumps. A fetch
/// records the generation it started under; if the key was invalidated
/// while the fetch was in flight, the result is still stored but already
/// stale, so the next access goes back to the remote store.
#[derive(Clone)]
pub struct CacheManager {
    backend: Arc<dyn CacheBackend>,
    config: Arc<CacheConfig>,
    generations: Arc<Mutex<HashMap<CacheKey, TrackedKey>>>,
    invalidations: broadcast::Sender<CacheKey>,
}

impl Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("config", &self.config)
            .field("backend", &self.backend)
            .field("subscribers", &self.invalidations.receiver_count())
            .finish()
    }
}

impl CacheManager {
    /// Create a cache manager with the backend named in the configuration
    pub fn new(config: CacheConfig) -> Result<Self, CacheError> {
        let backend: Arc<dyn CacheBackend> = match config.backend {
            CacheBackendKind::Memory => Arc::new(MemoryBackend::new()),
            CacheBackendKind::Redis => {
                let url = config.redis_url.as_deref().ok_or_else(|| {
                    CacheError::InvalidConfig("redis backend requires redis_url".to_string())
                })?;
                Arc::new(RedisBackend::new(url)?)
            }
        };

        Ok(Self::with_backend(backend, config))
    }

    /// In-process cache with the given configuration's TTL and prefix
    pub fn in_memory(config: CacheConfig) -> Self {
        Self::with_backend(Arc::new(MemoryBackend::new()), config)
    }

    pub fn with_backend(backend: Arc<dyn CacheBackend>, config: CacheConfig) -> Self {
        let (invalidations, _) = broadcast::channel(INVALIDATION_CHANNEL_CAPACITY);
        Self {
            backend,
            config: Arc::new(config),
            generations: Arc::new(Mutex::new(HashMap::new())),
            invalidations,
        }
    }

    /// Get current configuration
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn ttl(&self) -> Duration {
        Duration::from_secs(self.config.default_ttl_seconds)
    }

    fn render(&self, key: &CacheKey) -> String {
        key.render(&self.config.key_prefix)
    }

    /// Track a fetch of `key` until the returned guard drops
    fn begin_fetch(&self, key: &CacheKey) -> FetchGuard<'_> {
        let started = self
            .generations
            .lock()
            .map(|mut generations| {
                let tracked = generations.entry(key.clone()).or_default();
                tracked.in_flight += 1;
                tracked.generation
            })
            .unwrap_or(0);

        FetchGuard {
            generations: &self.generations,
            key: key.clone(),
            started,
        }
    }

    /// Only keys with a fetch in flight are tracked; invalidating any other
    /// key cannot race a fetch.
    fn bump_generation(&self, key: &CacheKey) {
        if let Ok(mut generations) = self.generations.lock() {
            if let Some(tracked) = generations.get_mut(key) {
                tracked.generation += 1;
            }
        }
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.generations.lock().map(|g| g.len()).unwrap_or(0)
    }

    /// Fresh entry decoded as `T`, if any
    async fn fresh<T: DeserializeOwned>(&self, rendered: &str) -> Option<T> {
        match self.backend.get(rendered).await {
            Ok(Some(entry)) if !entry.stale => match serde_json::from_value(entry.value) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(key = rendered, error = %e, "cached value does not decode, refetching");
                    None
                }
            },
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(key = rendered, error = %e, "cache read failed, fetching directly");
                None
            }
        }
    }

    /// Return the cached value for `key` or run `fetcher` and cache its result.
    ///
    /// Fetch errors are returned unchanged and never cached. Backend
    /// failures are logged and do not fail the read.
    pub async fn get_or_fetch<T, E, F, Fut>(&self, key: &CacheKey, fetcher: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let rendered = self.render(key);

        if let Some(value) = self.fresh(&rendered).await {
            tracing::trace!(key = %rendered, "cache hit");
            return Ok(value);
        }

        tracing::trace!(key = %rendered, "cache miss");
        let fetch = self.begin_fetch(key);
        let value = fetcher().await?;

        match serde_json::to_value(&value) {
            Ok(json) => {
                let entry = CacheEntry {
                    value: json,
                    stale: fetch.invalidated(),
                };
                if let Err(e) = self.backend.put(&rendered, entry, self.ttl()).await {
                    tracing::warn!(key = %rendered, error = %e, "cache write failed");
                }
                // An invalidation between the check and the write
                if fetch.invalidated() {
                    if let Err(e) = self.backend.mark_stale(&rendered).await {
                        tracing::warn!(key = %rendered, error = %e, "cache invalidation failed");
                    }
                }
            }
            Err(e) => {
                tracing::warn!(key = %rendered, error = %e, "value is not cacheable");
            }
        }

        Ok(value)
    }

    /// Current cached value without fetching; stale or expired entries count as absent
    pub async fn peek<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        self.fresh(&self.render(key)).await
    }

    pub async fn state(&self, key: &CacheKey) -> EntryState {
        match self.backend.get(&self.render(key)).await {
            Ok(Some(entry)) if entry.stale => EntryState::Stale,
            Ok(Some(_)) => EntryState::Fresh,
            _ => EntryState::Missing,
        }
    }

    /// Mark `key` stale so the next access re-fetches.
    ///
    /// Idempotent: invalidating an already stale or absent key changes
    /// nothing observable beyond the notification.
    pub async fn invalidate(&self, key: &CacheKey) {
        let rendered = self.render(key);
        self.bump_generation(key);

        if let Err(e) = self.backend.mark_stale(&rendered).await {
            tracing::warn!(key = %rendered, error = %e, "cache invalidation failed, dropping entry");
            if let Err(e) = self.backend.remove(&rendered).await {
                tracing::warn!(key = %rendered, error = %e, "cache entry removal failed");
            }
        }

        crate::debug_log!(key = %rendered, "invalidated");
        // No subscribers is fine
        let _ = self.invalidations.send(key.clone());
    }

    /// Receive every key invalidated from now on
    pub fn subscribe(&self) -> broadcast::Receiver<CacheKey> {
        self.invalidations.subscribe()
    }

    /// Drop an entry entirely
    pub async fn remove(&self, key: &CacheKey) -> Result<bool, CacheError> {
        self.backend.remove(&self.render(key)).await
    }

    /// Drop every entry under this manager's key prefix
    pub async fn clear(&self) -> Result<usize, CacheError> {
        self.backend
            .clear(&format!("{}:", self.config.key_prefix))
            .await
    }

    /// Check cache backend connectivity
    pub async fn health_check(&self) -> Result<(), CacheError> {
        self.backend.health_check().await
    }
}
