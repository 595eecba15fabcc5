//! Record store backed by a Supabase project's PostgREST endpoint.
//!
//! Wraps the two calls the visit log needs (ordered select, single insert)
//! using [`reqwest`]. Auth is the project's public key sent both as `apikey`
//! and as a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use visitlog_core::visit::{NewVisit, VisitRecord};

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::{OrderBy, RecordStore};

/// REST path prefix on a Supabase project.
const REST_PREFIX: &str = "/rest/v1";

/// Error body returned by PostgREST on failure.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: Option<String>,
    details: Option<String>,
}

/// Resolved connection target.
#[derive(Debug, Clone)]
struct Endpoint {
    rest_url: String,
    anon_key: String,
}

/// HTTP client for a Supabase project's REST API.
pub struct SupabaseStore {
    client: reqwest::Client,
    endpoint: Result<Endpoint, &'static str>,
}

impl SupabaseStore {
    /// Create a store client from configuration.
    ///
    /// Missing URL or key is not an error here; it surfaces on the first
    /// call as [`StoreError::NotConfigured`].
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a store client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &StoreConfig) -> Self {
        let endpoint = match (&config.url, &config.anon_key) {
            (None, _) => Err("SUPABASE_URL"),
            (_, None) => Err("SUPABASE_ANON_KEY"),
            (Some(url), Some(key)) => Ok(Endpoint {
                rest_url: format!("{}{REST_PREFIX}", url.trim_end_matches('/')),
                anon_key: key.clone(),
            }),
        };
        Self { client, endpoint }
    }

    fn endpoint(&self) -> Result<&Endpoint, StoreError> {
        self.endpoint
            .as_ref()
            .map_err(|missing| StoreError::NotConfigured(*missing))
    }

    /// Collection URL for `table`.
    fn table_url(&self, table: &str) -> Result<String, StoreError> {
        Ok(format!("{}/{table}", self.endpoint()?.rest_url))
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, StoreError> {
        let key = &self.endpoint()?.anon_key;
        Ok(builder
            .header("apikey", key)
            .bearer_auth(key)
            .header(reqwest::header::ACCEPT, "application/json"))
    }

    /// Turn a non-2xx response into [`StoreError::Api`] carrying the
    /// store's own message when it sent one.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Api {
            status: status.as_u16(),
            message: error_message(status, &body),
        })
    }
}

/// Pick the most useful message out of an error response body.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(err) = serde_json::from_str::<PostgrestError>(body) {
        if let Some(message) = err.message.or(err.details).filter(|m| !m.is_empty()) {
            return message;
        }
    }
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
    } else {
        body.to_string()
    }
}

#[async_trait]
impl RecordStore for SupabaseStore {
    async fn list(&self, table: &str, order: &OrderBy) -> Result<Vec<VisitRecord>, StoreError> {
        let url = self.table_url(table)?;
        let request = self
            .authorized(self.client.get(&url))?
            .query(&[("select", "*".to_string()), ("order", order.to_query())]);

        tracing::debug!(table, order = %order.to_query(), "Listing records");
        let response = request.send().await.inspect_err(|e| {
            tracing::warn!(table, error = %e, "Record list request failed");
        })?;
        let records = Self::check_status(response)
            .await?
            .json::<Vec<VisitRecord>>()
            .await?;

        tracing::debug!(table, count = records.len(), "Listed records");
        Ok(records)
    }

    async fn insert(&self, table: &str, visit: &NewVisit) -> Result<(), StoreError> {
        let url = self.table_url(table)?;
        let request = self
            .authorized(self.client.post(&url))?
            .header("Prefer", "return=minimal")
            .json(&[visit]);

        let response = request.send().await.inspect_err(|e| {
            tracing::warn!(table, error = %e, "Record insert request failed");
        })?;
        Self::check_status(response).await?;

        tracing::debug!(table, "Inserted record");
        Ok(())
    }

    fn is_configured(&self) -> bool {
        self.endpoint.is_ok()
    }
}
