//! Convenience re-exports for common remote-store usage

// Core traits
pub use crate::traits::{IdFilter, RemoteStore};

// Error types
pub use crate::errors::{ErrorKind, RemoteQueryError};

// Table handle and implementations
pub use crate::collection::Collection;
pub use crate::memory::MemoryStore;
pub use crate::rest_client::RestClient;

// Identifiers and validation
pub use crate::id_type::RecordId;
pub use crate::validation::{ColumnName, TableName, ValidationError};

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
pub use serde_json::Value;
pub use uuid::Uuid;
