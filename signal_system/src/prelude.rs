//! Convenience re-exports for common signal-system usage

// Core signal system components
pub use crate::event::{DatabaseEvent, EventType};
pub use crate::manager::SignalManager;
pub use crate::types::{CallbackId, EventCallback};

// Common external dependencies
pub use serde_json;
