//! Record identifiers
//!
//! Records are addressed by a single string identifier, UUIDs in practice.

use crate::errors::RemoteQueryError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use uuid::Uuid;

/// Non-empty record identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Rejects empty and whitespace-only identifiers
    pub fn new(id: impl Into<String>) -> Result<Self, RemoteQueryError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(RemoteQueryError::invalid_input(
                "record id must not be empty",
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read the identifier out of a JSON record
    pub fn from_record(record: &serde_json::Value, column: &str) -> Option<Self> {
        match record.get(column)? {
            serde_json::Value::String(s) => Self::new(s.as_str()).ok(),
            serde_json::Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Uuid> for RecordId {
    fn from(id: Uuid) -> Self {
        RecordId(id.to_string())
    }
}

impl From<&Uuid> for RecordId {
    fn from(id: &Uuid) -> Self {
        RecordId(id.to_string())
    }
}

impl TryFrom<String> for RecordId {
    type Error = RemoteQueryError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl TryFrom<&str> for RecordId {
    type Error = RemoteQueryError;

    fn try_from(id: &str) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}
