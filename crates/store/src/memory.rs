//! In-process record store.
//!
//! Behaves like the remote store for the two calls the visit log makes:
//! ids and strictly increasing `created_at` values are assigned on insert,
//! and lists come back ordered. Also stands in for the external feedback
//! writer ([`MemoryStore::annotate`]) and can be told to fail, which the
//! form and API tests rely on.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use visitlog_core::types::{RecordId, Timestamp};
use visitlog_core::visit::{NewVisit, VisitRecord, CREATED_AT_COLUMN};

use crate::error::StoreError;
use crate::{OrderBy, RecordStore};

#[derive(Default)]
struct Tables {
    rows: HashMap<String, Vec<VisitRecord>>,
    next_id: u64,
    last_created_at: Option<Timestamp>,
}

/// Record store held entirely in memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    failure: RwLock<Option<String>>,
    list_calls: AtomicUsize,
    insert_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with `message` until cleared with `None`.
    pub async fn set_failure(&self, message: Option<&str>) {
        *self.failure.write().await = message.map(str::to_string);
    }

    /// Write feedback onto an existing record, as the external writer does.
    ///
    /// Returns `false` when no record with `id` exists in `table`.
    pub async fn annotate(&self, table: &str, id: &RecordId, feedback: &str) -> bool {
        let mut tables = self.tables.write().await;
        let Some(row) = tables
            .rows
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|r| &r.id == id))
        else {
            return false;
        };
        row.ai_feedback = Some(feedback.to_string());
        true
    }

    /// Insert a fully formed record, bypassing id/timestamp assignment.
    pub async fn seed(&self, table: &str, record: VisitRecord) {
        self.tables
            .write()
            .await
            .rows
            .entry(table.to_string())
            .or_default()
            .push(record);
    }

    /// Number of rows currently in `table`.
    pub async fn len(&self, table: &str) -> usize {
        self.tables.read().await.rows.get(table).map_or(0, Vec::len)
    }

    /// Number of `list` calls made, including failed ones.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of `insert` calls made, including failed ones.
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    async fn check_failure(&self) -> Result<(), StoreError> {
        match self.failure.read().await.as_ref() {
            Some(message) => Err(StoreError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(&self, table: &str, order: &OrderBy) -> Result<Vec<VisitRecord>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure().await?;

        if order.column != CREATED_AT_COLUMN {
            return Err(StoreError::Api {
                status: 400,
                message: format!("column {table}.{} does not exist", order.column),
            });
        }

        let mut rows = self
            .tables
            .read()
            .await
            .rows
            .get(table)
            .cloned()
            .unwrap_or_default();

        rows.sort_by_key(|r| r.created_at);
        if !order.ascending {
            rows.reverse();
        }
        Ok(rows)
    }

    async fn insert(&self, table: &str, visit: &NewVisit) -> Result<(), StoreError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure().await?;

        let mut tables = self.tables.write().await;
        tables.next_id += 1;
        let id = RecordId::new(tables.next_id.to_string());

        let mut created_at = Utc::now();
        if let Some(last) = tables.last_created_at {
            if created_at <= last {
                created_at = last + Duration::microseconds(1);
            }
        }
        tables.last_created_at = Some(created_at);

        tables
            .rows
            .entry(table.to_string())
            .or_default()
            .push(VisitRecord::from_new(id, created_at, visit));
        Ok(())
    }
}
