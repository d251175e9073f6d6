//! PostgREST HTTP client
//!
//! Speaks the REST dialect of a hosted Supabase project: one table per path
//! segment, filters in the query string, `apikey` plus bearer authorization.
//! Timeouts are the only transport policy applied here; there is no retry.

use crate::errors::RemoteQueryError;
use crate::traits::{IdFilter, RemoteStore};
use crate::validation::TableName;
use async_trait::async_trait;
use config::{RemoteConfig, Returning};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

/// Media type asking PostgREST for exactly one object instead of an array
const SINGLE_OBJECT_MEDIA_TYPE: &str = "application/vnd.pgrst.object+json";

/// HTTP client for the remote REST endpoint
#[derive(Clone)]
pub struct RestClient {
    http: Client,
    rest_url: String,
    api_key: String,
    returning: Returning,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // api_key stays out of logs
        f.debug_struct("RestClient")
            .field("rest_url", &self.rest_url)
            .field("returning", &self.returning)
            .finish()
    }
}

impl RestClient {
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteQueryError> {
        let mut builder = Client::builder();
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        Ok(Self {
            http: builder.build()?,
            rest_url: config.rest_url(),
            api_key: config.api_key.clone(),
            returning: config.returning,
        })
    }

    pub fn rest_url(&self) -> &str {
        &self.rest_url
    }

    /// Build an authorized request against a table
    fn request(&self, method: Method, table: &TableName) -> RequestBuilder {
        let url = format!("{}/{}", self.rest_url, table);
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn mutation(&self, method: Method, table: &TableName) -> RequestBuilder {
        self.request(method, table)
            .header("Prefer", self.returning.as_header_value())
    }

    /// Send and read the body, turning non-2xx responses into errors
    async fn send(&self, request: RequestBuilder) -> Result<String, RemoteQueryError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let error = RemoteQueryError::from_response(status.as_u16(), &body);
            tracing::debug!(
                status = status.as_u16(),
                code = ?error.code,
                "remote request failed: {}",
                error.message
            );
            return Err(error);
        }

        Ok(body)
    }

    async fn send_rows(&self, request: RequestBuilder) -> Result<Vec<Value>, RemoteQueryError> {
        let body = self.send(request).await?;
        if body.trim().is_empty() {
            // return=minimal
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Value>(&body)? {
            Value::Array(rows) => Ok(rows),
            Value::Null => Ok(Vec::new()),
            row => Ok(vec![row]),
        }
    }
}

#[async_trait]
impl RemoteStore for RestClient {
    async fn select(&self, table: &TableName) -> Result<Vec<Value>, RemoteQueryError> {
        tracing::trace!(table = %table, "select");
        let request = self.request(Method::GET, table).query(&[("select", "*")]);
        self.send_rows(request).await
    }

    async fn select_single(
        &self,
        table: &TableName,
        filter: &IdFilter,
    ) -> Result<Value, RemoteQueryError> {
        tracing::trace!(table = %table, id = %filter.value, "select single");
        let request = self
            .request(Method::GET, table)
            .header(reqwest::header::ACCEPT, SINGLE_OBJECT_MEDIA_TYPE)
            .query(&[("select", "*")])
            .query(&[filter.query_pair()]);

        let body = self.send(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn insert(
        &self,
        table: &TableName,
        record: Value,
    ) -> Result<Vec<Value>, RemoteQueryError> {
        tracing::trace!(table = %table, "insert");
        let request = self.mutation(Method::POST, table).json(&record);
        self.send_rows(request).await
    }

    async fn update(
        &self,
        table: &TableName,
        filter: &IdFilter,
        patch: Value,
    ) -> Result<Vec<Value>, RemoteQueryError> {
        tracing::trace!(table = %table, id = %filter.value, "update");
        let request = self
            .mutation(Method::PATCH, table)
            .query(&[filter.query_pair()])
            .json(&patch);
        self.send_rows(request).await
    }

    async fn delete(
        &self,
        table: &TableName,
        filter: &IdFilter,
    ) -> Result<Vec<Value>, RemoteQueryError> {
        tracing::trace!(table = %table, id = %filter.value, "delete");
        let request = self
            .mutation(Method::DELETE, table)
            .query(&[filter.query_pair()]);
        self.send_rows(request).await
    }
}
