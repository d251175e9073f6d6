//! Database event types and definitions
//!
//! This module defines the structure of the events emitted after a
//! successful mutation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Database event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    Create,
    Update,
    Delete,
}

/// Database event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseEvent {
    /// Event type
    pub event_type: EventType,
    /// Table name
    pub table_name: String,
    /// Record ID (if available)
    pub record_id: Option<String>,
    /// Fields that were sent to the store
    pub payload: Map<String, Value>,
    /// Rows the store sent back, empty under minimal returns
    pub returned: Vec<Value>,
    /// Event timestamp (UTC)
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl DatabaseEvent {
    pub fn new(event_type: EventType, table_name: String) -> Self {
        Self {
            event_type,
            table_name,
            record_id: None,
            payload: Map::new(),
            returned: Vec::new(),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn with_record_id(mut self, record_id: String) -> Self {
        self.record_id = Some(record_id);
        self
    }

    /// Copy the fields of a JSON object into the payload; other values are ignored
    pub fn with_payload(mut self, payload: &Value) -> Self {
        if let Value::Object(fields) = payload {
            for (key, value) in fields {
                self.payload.insert(key.clone(), value.clone());
            }
        }
        self
    }

    pub fn with_returned(mut self, rows: Vec<Value>) -> Self {
        self.returned = rows;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let event = DatabaseEvent::new(EventType::Update, "users".to_string())
            .with_record_id("u1".to_string())
            .with_payload(&json!({ "email": "ana2@x.com" }))
            .with_payload(&json!("ignored"));

        assert_eq!(event.event_type, EventType::Update);
        assert_eq!(event.record_id.as_deref(), Some("u1"));
        assert_eq!(event.payload.len(), 1);
        assert_eq!(event.payload["email"], "ana2@x.com");
        assert!(event.returned.is_empty());
    }
}
