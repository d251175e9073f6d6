//! In-process remote store
//!
//! Behaves like the hosted service for the operations of [`RemoteStore`]:
//! identifiers and `created_at` are assigned on insert, duplicate
//! identifiers are rejected, single-row misses use the PostgREST wording.
//! Used by tests and the demo.

use crate::errors::{ErrorKind, RemoteQueryError, SINGLE_ROW_MISMATCH_CODE, UNIQUE_VIOLATION_CODE};
use crate::id_type::RecordId;
use crate::traits::{IdFilter, RemoteStore};
use crate::validation::TableName;
use async_trait::async_trait;
use config::Returning;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::RwLock;

type Row = Map<String, Value>;

#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<Row>>>,
    id_column: String,
    returning: Returning,
    next_failure: Mutex<Option<RemoteQueryError>>,
}

impl MemoryStore {
    /// Store with the given (empty) tables
    pub fn with_tables(tables: &[&str]) -> Self {
        Self {
            tables: RwLock::new(
                tables
                    .iter()
                    .map(|name| (name.to_string(), Vec::new()))
                    .collect(),
            ),
            id_column: crate::collection::DEFAULT_ID_COLUMN.to_string(),
            returning: Returning::Representation,
            next_failure: Mutex::new(None),
        }
    }

    pub fn with_returning(mut self, returning: Returning) -> Self {
        self.returning = returning;
        self
    }

    /// The next call, whatever it is, fails with this error
    pub fn fail_next(&self, error: RemoteQueryError) {
        if let Ok(mut slot) = self.next_failure.lock() {
            *slot = Some(error);
        }
    }

    /// Number of rows currently held in a table
    pub async fn row_count(&self, table: &str) -> usize {
        self.tables.read().await.get(table).map_or(0, Vec::len)
    }

    fn take_failure(&self) -> Result<(), RemoteQueryError> {
        match self.next_failure.lock().ok().and_then(|mut slot| slot.take()) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn missing_table(table: &TableName) -> RemoteQueryError {
        RemoteQueryError::new(
            ErrorKind::NotFound,
            format!("relation \"public.{}\" does not exist", table),
        )
        .with_status(404)
        .with_code("42P01")
    }

    fn returned(&self, rows: Vec<Row>) -> Vec<Value> {
        match self.returning {
            Returning::Representation => rows.into_iter().map(Value::Object).collect(),
            Returning::Minimal => Vec::new(),
        }
    }
}

fn into_object(value: Value, what: &str) -> Result<Row, RemoteQueryError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(RemoteQueryError::invalid_input(format!(
            "{} must be a JSON object, got {}",
            what, other
        ))),
    }
}

fn row_matches(row: &Row, filter: &IdFilter) -> bool {
    match row.get(filter.column.as_str()) {
        Some(Value::String(s)) => s == filter.value.as_str(),
        Some(Value::Number(n)) => n.to_string() == filter.value.as_str(),
        _ => false,
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn select(&self, table: &TableName) -> Result<Vec<Value>, RemoteQueryError> {
        self.take_failure()?;
        let tables = self.tables.read().await;
        let rows = tables
            .get(table.as_str())
            .ok_or_else(|| Self::missing_table(table))?;
        Ok(rows.iter().cloned().map(Value::Object).collect())
    }

    async fn select_single(
        &self,
        table: &TableName,
        filter: &IdFilter,
    ) -> Result<Value, RemoteQueryError> {
        self.take_failure()?;
        let tables = self.tables.read().await;
        let rows = tables
            .get(table.as_str())
            .ok_or_else(|| Self::missing_table(table))?;

        let mut matching = rows.iter().filter(|row| row_matches(row, filter));
        match (matching.next(), matching.next()) {
            (Some(row), None) => Ok(Value::Object(row.clone())),
            _ => Err(RemoteQueryError::new(
                ErrorKind::NotFound,
                "JSON object requested, multiple (or no) rows returned",
            )
            .with_status(406)
            .with_code(SINGLE_ROW_MISMATCH_CODE)),
        }
    }

    async fn insert(
        &self,
        table: &TableName,
        record: Value,
    ) -> Result<Vec<Value>, RemoteQueryError> {
        self.take_failure()?;
        let mut row = into_object(record, "insert payload")?;

        let mut tables = self.tables.write().await;
        let rows = tables
            .get_mut(table.as_str())
            .ok_or_else(|| Self::missing_table(table))?;

        let id = match RecordId::from_record(&Value::Object(row.clone()), &self.id_column) {
            Some(id) => id,
            None => {
                let id = RecordId::from(uuid::Uuid::new_v4());
                row.insert(self.id_column.clone(), Value::String(id.to_string()));
                id
            }
        };

        let filter = IdFilter::new(
            crate::validation::ColumnName::new(&self.id_column)
                .map_err(|e| RemoteQueryError::invalid_input(e.to_string()))?,
            id,
        );
        if rows.iter().any(|existing| row_matches(existing, &filter)) {
            return Err(RemoteQueryError::new(
                ErrorKind::Conflict,
                format!(
                    "duplicate key value violates unique constraint \"{}_pkey\"",
                    table
                ),
            )
            .with_status(409)
            .with_code(UNIQUE_VIOLATION_CODE));
        }

        row.entry("created_at")
            .or_insert_with(|| Value::String(chrono::Utc::now().to_rfc3339()));

        rows.push(row.clone());
        Ok(self.returned(vec![row]))
    }

    async fn update(
        &self,
        table: &TableName,
        filter: &IdFilter,
        patch: Value,
    ) -> Result<Vec<Value>, RemoteQueryError> {
        self.take_failure()?;
        let patch = into_object(patch, "update patch")?;

        let mut tables = self.tables.write().await;
        let rows = tables
            .get_mut(table.as_str())
            .ok_or_else(|| Self::missing_table(table))?;

        let mut updated = Vec::new();
        for row in rows.iter_mut().filter(|row| row_matches(row, filter)) {
            for (field, value) in &patch {
                row.insert(field.clone(), value.clone());
            }
            updated.push(row.clone());
        }

        Ok(self.returned(updated))
    }

    async fn delete(
        &self,
        table: &TableName,
        filter: &IdFilter,
    ) -> Result<Vec<Value>, RemoteQueryError> {
        self.take_failure()?;
        let mut tables = self.tables.write().await;
        let rows = tables
            .get_mut(table.as_str())
            .ok_or_else(|| Self::missing_table(table))?;

        let (removed, kept): (Vec<Row>, Vec<Row>) =
            rows.drain(..).partition(|row| row_matches(row, filter));
        *rows = kept;

        Ok(self.returned(removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ColumnName;
    use serde_json::json;

    fn users() -> TableName {
        TableName::new("users").unwrap()
    }

    fn by_id(id: &str) -> IdFilter {
        IdFilter::new(ColumnName::new("id").unwrap(), RecordId::new(id).unwrap())
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamp() {
        let store = MemoryStore::with_tables(&["users"]);
        let rows = store
            .insert(&users(), json!({ "username": "ana", "email": "ana@x.com" }))
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        let id = rows[0]["id"].as_str().unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());
        assert!(rows[0]["created_at"].is_string());
        assert_eq!(store.row_count("users").await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_conflict() {
        let store = MemoryStore::with_tables(&["users"]);
        store.insert(&users(), json!({ "id": "u1" })).await.unwrap();
        let err = store.insert(&users(), json!({ "id": "u1" })).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.code.as_deref(), Some(UNIQUE_VIOLATION_CODE));
    }

    #[tokio::test]
    async fn test_single_requires_exactly_one_row() {
        let store = MemoryStore::with_tables(&["users"]);
        let err = store.select_single(&users(), &by_id("nope")).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.status, Some(406));

        store.insert(&users(), json!({ "id": "u1", "username": "ana" })).await.unwrap();
        let row = store.select_single(&users(), &by_id("u1")).await.unwrap();
        assert_eq!(row["username"], "ana");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = MemoryStore::with_tables(&["users"]);
        store
            .insert(&users(), json!({ "id": "u1", "username": "ana", "email": "a@x.com" }))
            .await
            .unwrap();

        let updated = store
            .update(&users(), &by_id("u1"), json!({ "email": "b@x.com" }))
            .await
            .unwrap();
        assert_eq!(updated[0]["email"], "b@x.com");
        assert_eq!(updated[0]["username"], "ana");

        let removed = store.delete(&users(), &by_id("u1")).await.unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(store.row_count("users").await, 0);

        // deleting nothing is not an error
        assert!(store.delete(&users(), &by_id("u1")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_minimal_returning_and_unknown_table() {
        let store = MemoryStore::with_tables(&["users"]).with_returning(Returning::Minimal);
        assert!(store.insert(&users(), json!({})).await.unwrap().is_empty());
        assert_eq!(store.row_count("users").await, 1);

        let err = store
            .select(&TableName::new("ghosts").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.code.as_deref(), Some("42P01"));
    }

    #[tokio::test]
    async fn test_fail_next_fires_once() {
        let store = MemoryStore::with_tables(&["users"]);
        store.fail_next(RemoteQueryError::transport("connection reset"));
        let err = store.select(&users()).await.unwrap_err();
        assert_eq!(err.to_string(), "connection reset");
        assert!(store.select(&users()).await.is_ok());
    }
}
