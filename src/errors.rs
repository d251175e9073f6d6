//! Error types for the StoreHooks crate
//!
//! Hook operations themselves only ever fail with [`RemoteQueryError`].
//! [`StoreHooksError`] covers setting the hooks up.

use cache_system::CacheError;
use config::ConfigError;
use remote_store::{RemoteQueryError, ValidationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreHooksError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Remote store error: {0}")]
    Remote(#[from] RemoteQueryError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Invalid resource: {0}")]
    InvalidResource(#[from] ValidationError),
}
