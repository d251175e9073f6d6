//! Type definitions for signal system

use crate::event::DatabaseEvent;
use std::sync::Arc;

/// Event callback; a returned error is logged and does not affect other callbacks
pub type EventCallback = Arc<dyn Fn(&DatabaseEvent) -> anyhow::Result<()> + Send + Sync>;

/// Handle returned on registration, used to remove the callback again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(pub(crate) u64);
