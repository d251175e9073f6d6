use crate::event::DatabaseEvent;
use crate::types::{CallbackId, EventCallback};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Signal manager for database event notifications
pub struct SignalManager {
    callbacks: std::sync::RwLock<Vec<(CallbackId, EventCallback)>>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for SignalManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalManager")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

impl SignalManager {
    pub fn new() -> Self {
        Self {
            callbacks: std::sync::RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Add event callback
    pub fn add_callback<F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&DatabaseEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let id = CallbackId(self.next_id.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut callbacks) = self.callbacks.write() {
            callbacks.push((id, Arc::new(callback)));
        }
        id
    }

    /// Remove a callback; returns whether it was registered
    pub fn remove_callback(&self, id: CallbackId) -> bool {
        match self.callbacks.write() {
            Ok(mut callbacks) => {
                let before = callbacks.len();
                callbacks.retain(|(registered, _)| *registered != id);
                callbacks.len() != before
            }
            Err(_) => false,
        }
    }

    /// Emit event to all subscribers
    pub fn emit(&self, event: &DatabaseEvent) {
        // Snapshot so callbacks may (un)register without deadlocking
        let callbacks: Vec<EventCallback> = match self.callbacks.read() {
            Ok(callbacks) => callbacks.iter().map(|(_, cb)| cb.clone()).collect(),
            Err(_) => return,
        };

        for callback in callbacks {
            if let Err(e) = callback(event) {
                tracing::warn!(
                    table = %event.table_name,
                    event_type = ?event.event_type,
                    error = %e,
                    "event callback failed"
                );
            }
        }
    }

    /// Clear all callbacks
    pub fn clear_callbacks(&self) {
        if let Ok(mut callbacks) = self.callbacks.write() {
            callbacks.clear();
        }
    }

    /// Get number of registered callbacks
    pub fn callback_count(&self) -> usize {
        self.callbacks.read().map(|c| c.len()).unwrap_or(0)
    }
}

impl Default for SignalManager {
    fn default() -> Self {
        Self::new()
    }
}
