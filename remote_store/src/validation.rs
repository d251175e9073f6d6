//! Validation module
//!
//! Resource and column names end up in request URLs, so they are checked
//! once when a collection is created.

use std::fmt;
use thiserror::Error;

/// Rejected table or column name
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("name cannot be empty")]
    Empty,
    /// PostgreSQL truncates identifiers past 63 bytes
    #[error("name '{name}' is {length} characters long, at most {max_length} are allowed")]
    TooLong {
        name: String,
        length: usize,
        max_length: usize,
    },
    #[error("name '{0}' must start with a letter or underscore")]
    InvalidStartCharacter(String),
    #[error("name '{0}' may only contain ASCII letters, digits and underscores")]
    InvalidCharacters(String),
    #[error("name '{0}' is a PostgREST query parameter")]
    ReservedKeyword(String),
}

/// A validated table (resource) name that is safe to place in a request path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    /// PostgreSQL identifier length limit
    const MAX_LENGTH: usize = 63;

    pub fn new(name: &str) -> Result<Self, ValidationError> {
        validate_identifier(name, Self::MAX_LENGTH)?;
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated column name used in `column=eq.value` filters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnName(String);

impl ColumnName {
    const MAX_LENGTH: usize = 63;

    pub fn new(name: &str) -> Result<Self, ValidationError> {
        validate_identifier(name, Self::MAX_LENGTH)?;
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate_identifier(name: &str, max_length: usize) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::Empty);
    }

    if name.len() > max_length {
        return Err(ValidationError::TooLong {
            name: name.to_string(),
            length: name.len(),
            max_length,
        });
    }

    let first_char = name.chars().next().ok_or(ValidationError::Empty)?;
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(ValidationError::InvalidStartCharacter(name.to_string()));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::InvalidCharacters(name.to_string()));
    }

    if is_reserved_keyword(name) {
        return Err(ValidationError::ReservedKeyword(name.to_string()));
    }

    Ok(())
}

/// Query-string parameters PostgREST interprets itself
fn is_reserved_keyword(name: &str) -> bool {
    const RESERVED_KEYWORDS: &[&str] = &[
        "select", "order", "limit", "offset", "on_conflict", "columns", "and", "or", "not",
    ];

    RESERVED_KEYWORDS.contains(&name.to_ascii_lowercase().as_str())
}
