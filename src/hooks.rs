//! Resource hook factory
//!
//! [`ResourceHooks`] gives one resource its five operations. Reads go
//! through the cache manager; every successful mutation invalidates the
//! resource's list key exactly once and never touches another resource's
//! keys.

use crate::mutation::Mutation;
use crate::resource::Resource;
use cache_system::{CacheKey, CacheManager};
use remote_store::{Collection, RecordId, RemoteQueryError, RemoteStore, ValidationError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use signal_system::{DatabaseEvent, EventType, SignalManager};
use std::fmt::Display;
use std::marker::PhantomData;
use std::sync::Arc;

/// Input of an update mutation
#[derive(Debug, Clone)]
pub struct PatchRequest<P> {
    pub id: RecordId,
    pub updates: P,
}

impl<P> PatchRequest<P> {
    pub fn new(id: RecordId, updates: P) -> Self {
        Self { id, updates }
    }
}

/// CRUD surface for one resource
pub struct ResourceHooks<R: Resource> {
    collection: Collection,
    cache: Arc<CacheManager>,
    signals: Option<Arc<SignalManager>>,
    invalidate_record: bool,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for ResourceHooks<R> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            cache: self.cache.clone(),
            signals: self.signals.clone(),
            invalidate_record: self.invalidate_record,
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> std::fmt::Debug for ResourceHooks<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceHooks")
            .field("resource", &R::NAME)
            .field("collection", &self.collection)
            .field("has_signals", &self.signals.is_some())
            .field("invalidate_record", &self.invalidate_record)
            .finish()
    }
}

fn record_id(id: impl Display) -> Result<RecordId, RemoteQueryError> {
    RecordId::new(id.to_string())
}

fn to_payload<T: Serialize>(value: &T, what: &str) -> Result<Value, RemoteQueryError> {
    serde_json::to_value(value)
        .map_err(|e| RemoteQueryError::invalid_input(format!("{} is not serializable: {}", what, e)))
}

fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, RemoteQueryError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(RemoteQueryError::from))
        .collect()
}

/// Rows echoed by an applied mutation. The write already happened, so a row
/// that does not decode is logged and left out instead of failing the call.
fn decode_returned<T: DeserializeOwned>(table: &str, rows: Vec<Value>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value(row) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(table, error = %e, "returned row does not decode, skipping");
                None
            }
        })
        .collect()
}

impl<R: Resource> ResourceHooks<R> {
    /// Hooks over an existing table handle.
    ///
    /// Record-key invalidation on Update/Delete follows the cache
    /// configuration.
    pub fn new(collection: Collection, cache: Arc<CacheManager>) -> Self {
        let invalidate_record = cache.config().invalidate_record_on_mutation;
        Self {
            collection,
            cache,
            signals: None,
            invalidate_record,
            _resource: PhantomData,
        }
    }

    /// Hooks over the table named [`Resource::NAME`] in `store`
    pub fn for_store(
        store: Arc<dyn RemoteStore>,
        cache: Arc<CacheManager>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::new(Collection::new(store, R::NAME)?, cache))
    }

    /// Emit a [`DatabaseEvent`] after each successful mutation
    pub fn with_signals(mut self, signals: Arc<SignalManager>) -> Self {
        self.signals = Some(signals);
        self
    }

    /// `false` keeps the single-record key untouched by Update and Delete
    pub fn with_record_invalidation(mut self, enabled: bool) -> Self {
        self.invalidate_record = enabled;
        self
    }

    pub fn name(&self) -> &'static str {
        R::NAME
    }

    pub fn list_key(&self) -> CacheKey {
        CacheKey::list(R::NAME)
    }

    pub fn record_key(&self, id: &RecordId) -> CacheKey {
        CacheKey::record(R::NAME, id.as_str())
    }

    /// All records, cached under the list key
    pub async fn list(&self) -> Result<Vec<R::Record>, RemoteQueryError> {
        self.cache
            .get_or_fetch(&self.list_key(), || async {
                let rows = self.collection.select().await?;
                crate::trace_log!(table = R::NAME, rows = rows.len(), "list fetched");
                decode_rows(rows)
            })
            .await
    }

    /// Exactly one record, cached under its record key.
    ///
    /// An empty id fails without a remote call; zero or multiple matches
    /// fail with the store's message.
    pub async fn get_by_id(&self, id: impl Display) -> Result<R::Record, RemoteQueryError> {
        let id = record_id(id)?;
        self.cache
            .get_or_fetch(&self.record_key(&id), || async {
                let row = self.collection.select_single(&id).await?;
                serde_json::from_value(row).map_err(RemoteQueryError::from)
            })
            .await
    }

    /// Insert a record; the store assigns its identifier.
    ///
    /// Returns whatever rows the store sent back, possibly none. Once the
    /// store has accepted the write the call succeeds.
    pub async fn create(&self, payload: &R::Insert) -> Result<Vec<R::Record>, RemoteQueryError> {
        let payload = to_payload(payload, "insert payload")?;
        let rows = self.collection.insert(payload.clone()).await?;

        self.cache.invalidate(&self.list_key()).await;

        let created_id = rows
            .first()
            .and_then(|row| RecordId::from_record(row, self.collection.id_column().as_str()));
        self.emit(EventType::Create, created_id.as_ref(), &payload, &rows);

        Ok(decode_returned(R::NAME, rows))
    }

    /// Apply a partial patch. The identifier column is never sent.
    pub async fn update(
        &self,
        id: impl Display,
        patch: &R::Patch,
    ) -> Result<Vec<R::Record>, RemoteQueryError> {
        let id = record_id(id)?;
        let patch = match to_payload(patch, "patch")? {
            Value::Object(mut fields) => {
                fields.remove(self.collection.id_column().as_str());
                Value::Object(fields)
            }
            other => {
                return Err(RemoteQueryError::invalid_input(format!(
                    "patch must serialize to a JSON object, got {}",
                    other
                )));
            }
        };

        let rows = self.collection.update(&id, patch.clone()).await?;
        self.invalidate_after_mutation(&id).await;
        self.emit(EventType::Update, Some(&id), &patch, &rows);

        Ok(decode_returned(R::NAME, rows))
    }

    /// Remove a record
    pub async fn delete(&self, id: impl Display) -> Result<Vec<R::Record>, RemoteQueryError> {
        let id = record_id(id)?;
        let rows = self.collection.delete(&id).await?;

        self.invalidate_after_mutation(&id).await;
        self.emit(EventType::Delete, Some(&id), &Value::Null, &rows);

        Ok(decode_returned(R::NAME, rows))
    }

    /// Cached list, without fetching
    pub async fn cached_list(&self) -> Option<Vec<R::Record>> {
        self.cache.peek(&self.list_key()).await
    }

    /// Cached record, without fetching
    pub async fn cached_record(&self, id: impl Display) -> Option<R::Record> {
        let id = record_id(id).ok()?;
        self.cache.peek(&self.record_key(&id)).await
    }

    pub fn create_mutation(&self) -> Mutation<R::Insert, Vec<R::Record>> {
        let hooks = self.clone();
        Mutation::new(move |payload: R::Insert| {
            let hooks = hooks.clone();
            async move { hooks.create(&payload).await }
        })
    }

    pub fn update_mutation(&self) -> Mutation<PatchRequest<R::Patch>, Vec<R::Record>> {
        let hooks = self.clone();
        Mutation::new(move |request: PatchRequest<R::Patch>| {
            let hooks = hooks.clone();
            async move { hooks.update(&request.id, &request.updates).await }
        })
    }

    pub fn delete_mutation(&self) -> Mutation<RecordId, Vec<R::Record>> {
        let hooks = self.clone();
        Mutation::new(move |id: RecordId| {
            let hooks = hooks.clone();
            async move { hooks.delete(&id).await }
        })
    }

    async fn invalidate_after_mutation(&self, id: &RecordId) {
        self.cache.invalidate(&self.list_key()).await;
        if self.invalidate_record {
            self.cache.invalidate(&self.record_key(id)).await;
        }
    }

    fn emit(&self, event_type: EventType, id: Option<&RecordId>, payload: &Value, rows: &[Value]) {
        let Some(signals) = &self.signals else {
            return;
        };

        let mut event = DatabaseEvent::new(event_type, R::NAME.to_string())
            .with_payload(payload)
            .with_returned(rows.to_vec());
        if let Some(id) = id {
            event = event.with_record_id(id.to_string());
        }

        crate::debug_log!(table = R::NAME, event_type = ?event_type, "emitting mutation event");
        signals.emit(&event);
    }
}
