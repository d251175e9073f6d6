//! Signal system for database event handling
//!
//! This crate notifies registered observers after a mutation has been
//! accepted by the remote store.

pub mod event;
pub mod manager;
pub mod prelude;
pub mod types;

pub use event::{DatabaseEvent, EventType};
pub use manager::SignalManager;
pub use types::{CallbackId, EventCallback};
