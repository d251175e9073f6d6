//! Remote Store - access layer for the hosted relational database
//!
//! This crate provides the contract the data-access hooks consume
//! ([`RemoteStore`]), a table handle ([`Collection`]), the PostgREST client
//! ([`RestClient`]) and an in-process store ([`MemoryStore`]).

pub mod collection;
pub mod errors;
pub mod id_type;
pub mod memory;
pub mod prelude;
pub mod rest_client;
pub mod traits;
pub mod validation;

pub use collection::{Collection, DEFAULT_ID_COLUMN};
pub use errors::{ErrorKind, RemoteQueryError};
pub use id_type::RecordId;
pub use memory::MemoryStore;
pub use rest_client::RestClient;
pub use traits::*;
pub use validation::{ColumnName, TableName, ValidationError};
