//! Trait definitions
//!
//! This module defines the contract of the remote data service.

use crate::errors::RemoteQueryError;
use crate::id_type::RecordId;
use crate::validation::{ColumnName, TableName};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

/// Equality filter on the identifier column (`id=eq.<value>`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdFilter {
    pub column: ColumnName,
    pub value: RecordId,
}

impl IdFilter {
    pub fn new(column: ColumnName, value: RecordId) -> Self {
        Self { column, value }
    }

    /// PostgREST query parameter pair for this filter
    pub fn query_pair(&self) -> (String, String) {
        (self.column.to_string(), format!("eq.{}", self.value))
    }

    /// Does a JSON record satisfy this filter
    pub fn matches(&self, record: &Value) -> bool {
        RecordId::from_record(record, self.column.as_str()).as_ref() == Some(&self.value)
    }
}

/// Remote relational store, addressed table by table.
///
/// Records are opaque JSON objects. Every call is one request/response;
/// implementations do not retry.
#[async_trait]
pub trait RemoteStore: Send + Sync + Debug {
    /// All records of a table
    async fn select(&self, table: &TableName) -> Result<Vec<Value>, RemoteQueryError>;

    /// Exactly one record. Zero or multiple matches are an error.
    async fn select_single(
        &self,
        table: &TableName,
        filter: &IdFilter,
    ) -> Result<Value, RemoteQueryError>;

    /// Insert one record. Returned rows depend on the store's return preference.
    async fn insert(&self, table: &TableName, record: Value)
        -> Result<Vec<Value>, RemoteQueryError>;

    /// Apply a partial patch to the matching records
    async fn update(
        &self,
        table: &TableName,
        filter: &IdFilter,
        patch: Value,
    ) -> Result<Vec<Value>, RemoteQueryError>;

    /// Remove the matching records
    async fn delete(
        &self,
        table: &TableName,
        filter: &IdFilter,
    ) -> Result<Vec<Value>, RemoteQueryError>;
}
