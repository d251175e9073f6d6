//! Convenience re-exports for common StoreHooks usage
//!
//! # Example
//!
//! ```rust
//! use storehooks::prelude::*;
//!
//! let cache = CacheManager::in_memory(CacheConfig::default());
//! let store = std::sync::Arc::new(MemoryStore::with_tables(&["users", "posts", "comments"]));
//! let storehooks = StoreHooks::from_parts(store, std::sync::Arc::new(cache));
//! assert_eq!(storehooks.posts().unwrap().name(), "posts");
//! ```

// Core StoreHooks components
pub use crate::core::StoreHooks;
pub use crate::errors::StoreHooksError;
pub use crate::hooks::{PatchRequest, ResourceHooks};
pub use crate::models::{
    Comment, CommentPatch, NewComment, NewPost, NewUser, Post, PostPatch, User, UserPatch,
};
pub use crate::mutation::{Mutation, MutationStatus};
pub use crate::resource::{Comments, Posts, Resource, Users};
pub use crate::{CommentHooks, PostHooks, UserHooks};

// Re-export centralized config
pub use config::{AppConfig, CacheBackendKind, CacheConfig, RemoteConfig, Returning};

// Remote store access and its error type
pub use remote_store::prelude::*;

// Re-export signal system for event handling
pub use signal_system::prelude::*;

// Re-export cache system
pub use cache_system::prelude::*;

// Common external dependencies
pub use anyhow;
pub use tokio;
