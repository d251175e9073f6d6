use super::{CacheBackend, CacheEntry};
use crate::errors::CacheError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

#[derive(Debug)]
struct Slot {
    entry: CacheEntry,
    expires_at: Instant,
}

/// In-process cache backend
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slots: RwLock<HashMap<String, Slot>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let slots = self.slots.read().await;
        Ok(slots
            .get(key)
            .filter(|slot| slot.expires_at > Instant::now())
            .map(|slot| slot.entry.clone()))
    }

    async fn put(&self, key: &str, entry: CacheEntry, ttl: Duration) -> Result<(), CacheError> {
        let slot = Slot {
            entry,
            expires_at: Instant::now() + ttl,
        };
        self.slots.write().await.insert(key.to_string(), slot);
        Ok(())
    }

    async fn mark_stale(&self, key: &str) -> Result<bool, CacheError> {
        let mut slots = self.slots.write().await;
        match slots.get_mut(key) {
            Some(slot) => {
                slot.entry.stale = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.slots.write().await.remove(key).is_some())
    }

    async fn clear(&self, prefix: &str) -> Result<usize, CacheError> {
        let mut slots = self.slots.write().await;
        let before = slots.len();
        slots.retain(|key, _| !key.starts_with(prefix));
        Ok(before - slots.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire() {
        let backend = MemoryBackend::new();
        backend
            .put("k", CacheEntry::fresh(json!([1, 2])), Duration::from_secs(10))
            .await
            .unwrap();
        assert!(backend.get("k").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(11)).await;
        assert!(backend.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mark_stale_keeps_value() {
        let backend = MemoryBackend::new();
        assert!(!backend.mark_stale("k").await.unwrap());

        backend
            .put("k", CacheEntry::fresh(json!("v")), Duration::from_secs(60))
            .await
            .unwrap();
        assert!(backend.mark_stale("k").await.unwrap());

        let entry = backend.get("k").await.unwrap().unwrap();
        assert!(entry.stale);
        assert_eq!(entry.value, json!("v"));
    }

    #[tokio::test]
    async fn test_clear_by_prefix() {
        let backend = MemoryBackend::new();
        let ttl = Duration::from_secs(60);
        backend.put("a:users:list", CacheEntry::fresh(json!(1)), ttl).await.unwrap();
        backend.put("a:posts:list", CacheEntry::fresh(json!(2)), ttl).await.unwrap();
        backend.put("b:users:list", CacheEntry::fresh(json!(3)), ttl).await.unwrap();

        assert_eq!(backend.clear("a:").await.unwrap(), 2);
        assert_eq!(backend.len().await, 1);
    }
}
