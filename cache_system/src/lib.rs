//! Cache system for client-side query caching
//!
//! This crate provides the cache manager the data-access hooks read through:
//! get-or-fetch reads, idempotent invalidation with subscriber notification,
//! and in-memory or Redis storage.

/// Conditional debug logging, compiled in with the `debug-logging` feature
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub mod backend;
pub mod errors;
pub mod key;
pub mod manager;
pub mod prelude;

// Re-export centralized config
pub use config::CacheConfig;

pub use backend::{CacheBackend, CacheEntry, MemoryBackend, RedisBackend};
pub use errors::CacheError;
pub use key::CacheKey;
pub use manager::{CacheManager, EntryState};
