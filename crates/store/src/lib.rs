//! Remote record store access for the visit log.
//!
//! [`RecordStore`] is the seam between the form/history logic and the
//! remote data store. [`SupabaseStore`] talks to a Supabase project over
//! HTTP; [`MemoryStore`] keeps records in process for tests and local runs.

pub mod config;
pub mod error;
pub mod memory;
pub mod supabase;

use async_trait::async_trait;

use visitlog_core::visit::{NewVisit, VisitRecord, CREATED_AT_COLUMN};

pub use config::StoreConfig;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use supabase::SupabaseStore;

/// Sort order for a list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

impl OrderBy {
    pub fn new(column: impl Into<String>, ascending: bool) -> Self {
        Self {
            column: column.into(),
            ascending,
        }
    }

    /// `created_at` descending, the history display order.
    pub fn newest_first() -> Self {
        Self::new(CREATED_AT_COLUMN, false)
    }

    /// PostgREST `order` parameter value, e.g. `created_at.desc`.
    pub fn to_query(&self) -> String {
        let direction = if self.ascending { "asc" } else { "desc" };
        format!("{}.{direction}", self.column)
    }
}

/// Create/read access to a named collection of visit records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch every record of `table` in the given order.
    async fn list(&self, table: &str, order: &OrderBy) -> Result<Vec<VisitRecord>, StoreError>;

    /// Insert one record. The store assigns `id` and `created_at`.
    async fn insert(&self, table: &str, visit: &NewVisit) -> Result<(), StoreError>;

    /// Whether the store has what it needs to be reached at all.
    fn is_configured(&self) -> bool {
        true
    }
}
