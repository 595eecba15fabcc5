//! Visit history view.
//!
//! Holds the most recent fetch of the visit table. A refresh replaces the
//! held records wholesale; there is no merging and no watching for feedback
//! that arrives later, a later refresh simply picks it up.
//!
//! Each fetch is numbered when it starts. When fetches overlap, a result
//! only replaces the held list if no later-started fetch has landed first.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use visitlog_core::history::{render_history, HistoryEntry, RenderOptions};
use visitlog_core::visit::{VisitRecord, VISITS_TABLE};
use visitlog_store::{OrderBy, RecordStore, StoreError};

#[derive(Default)]
struct Held {
    /// Sequence number of the fetch that produced `records`.
    seq: u64,
    records: Vec<VisitRecord>,
}

pub struct HistoryView {
    store: Arc<dyn RecordStore>,
    options: RenderOptions,
    next_seq: AtomicU64,
    held: RwLock<Held>,
}

impl HistoryView {
    pub fn new(store: Arc<dyn RecordStore>, options: RenderOptions) -> Self {
        Self {
            store,
            options,
            next_seq: AtomicU64::new(0),
            held: RwLock::new(Held::default()),
        }
    }

    /// Fetch all visits newest first and replace the held list.
    ///
    /// On failure the previous list is kept and the store error returned.
    /// A fetch that finishes after a newer one has already landed returns
    /// its own result but leaves the held list alone.
    pub async fn refresh(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let records = self
            .store
            .list(VISITS_TABLE, &OrderBy::newest_first())
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "History refresh failed"))?;

        let entries = render_history(&records, &self.options);
        let mut held = self.held.write().await;
        if seq > held.seq {
            tracing::debug!(seq, count = records.len(), "History refreshed");
            *held = Held { seq, records };
        } else {
            tracing::debug!(seq, held = held.seq, "Stale history fetch discarded");
        }
        Ok(entries)
    }

    /// Render the records from the last successful refresh.
    pub async fn entries(&self) -> Vec<HistoryEntry> {
        render_history(&self.held.read().await.records, &self.options)
    }
}
