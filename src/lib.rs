//! # StoreHooks
//!
//! Typed, cached data-access hooks for the `users`, `posts` and `comments`
//! tables of a hosted PostgREST (Supabase) database.
//!
//! Every resource gets the same five operations from one generic factory:
//! list, get by id, create, update and delete. Reads go through a shared
//! client-side cache; each successful mutation marks the resource's
//! cached list stale so the next read re-fetches.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use storehooks::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // SUPABASE_PROJECT_URL and SUPABASE_API_KEY, from the environment or `.env`
//!     let storehooks = StoreHooks::from_env()?;
//!     let users = storehooks.users()?;
//!
//!     let created = users
//!         .create(&NewUser {
//!             username: "ana".to_string(),
//!             email: "ana@x.com".to_string(),
//!         })
//!         .await?;
//!
//!     for user in users.list().await? {
//!         println!("{} <{}>", user.id, user.email.unwrap_or_default());
//!     }
//!
//!     if let Some(ana) = created.first() {
//!         users.delete(ana.id).await?;
//!     }
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
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

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod hooks;
pub mod models;
pub mod mutation;
pub mod prelude;
pub mod resource;

// Re-export the main public types for convenience
pub use core::StoreHooks;
pub use errors::StoreHooksError;
pub use hooks::{PatchRequest, ResourceHooks};
pub use mutation::{Mutation, MutationStatus};
pub use resource::{Comments, Posts, Resource, Users};

pub type UserHooks = ResourceHooks<Users>;
pub type PostHooks = ResourceHooks<Posts>;
pub type CommentHooks = ResourceHooks<Comments>;

// Re-export centralized config
pub use config::{AppConfig, CacheConfig, RemoteConfig};

// Re-export internal crates used by the public API
pub use cache_system;
pub use remote_store;
pub use signal_system;

// Re-export external dependencies used in public API
pub use async_trait;
