//! Convenience re-exports for common cache-system usage

// Core cache system components
pub use crate::backend::{CacheBackend, CacheEntry, MemoryBackend, RedisBackend};
pub use crate::errors::CacheError;
pub use crate::key::CacheKey;
pub use crate::manager::{CacheManager, EntryState};

// Re-export centralized config
pub use config::{CacheBackendKind, CacheConfig};
