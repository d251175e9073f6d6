use crate::errors::RemoteQueryError;
use crate::id_type::RecordId;
use crate::traits::{IdFilter, RemoteStore};
use crate::validation::{ColumnName, TableName, ValidationError};
use serde_json::Value;
use std::sync::Arc;

/// Identifier column used when none is given
pub const DEFAULT_ID_COLUMN: &str = "id";

/// Handle for one remote table
#[derive(Clone)]
pub struct Collection {
    store: Arc<dyn RemoteStore>,
    table: TableName,
    id_column: ColumnName,
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("table", &self.table)
            .field("id_column", &self.id_column)
            .finish()
    }
}

impl Collection {
    pub fn new(store: Arc<dyn RemoteStore>, table: &str) -> Result<Self, ValidationError> {
        Self::with_id_column(store, table, DEFAULT_ID_COLUMN)
    }

    pub fn with_id_column(
        store: Arc<dyn RemoteStore>,
        table: &str,
        id_column: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            store,
            table: TableName::new(table)?,
            id_column: ColumnName::new(id_column)?,
        })
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    pub fn id_column(&self) -> &ColumnName {
        &self.id_column
    }

    fn filter(&self, id: &RecordId) -> IdFilter {
        IdFilter::new(self.id_column.clone(), id.clone())
    }

    pub async fn select(&self) -> Result<Vec<Value>, RemoteQueryError> {
        self.store.select(&self.table).await
    }

    pub async fn select_single(&self, id: &RecordId) -> Result<Value, RemoteQueryError> {
        self.store.select_single(&self.table, &self.filter(id)).await
    }

    pub async fn insert(&self, record: Value) -> Result<Vec<Value>, RemoteQueryError> {
        self.store.insert(&self.table, record).await
    }

    pub async fn update(&self, id: &RecordId, patch: Value) -> Result<Vec<Value>, RemoteQueryError> {
        self.store.update(&self.table, &self.filter(id), patch).await
    }

    pub async fn delete(&self, id: &RecordId) -> Result<Vec<Value>, RemoteQueryError> {
        self.store.delete(&self.table, &self.filter(id)).await
    }
}
