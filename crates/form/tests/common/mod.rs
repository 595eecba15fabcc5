#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use visitlog_core::draft::{DraftField, ResetPolicy};
use visitlog_core::history::RenderOptions;
use visitlog_core::visit::{NewVisit, VisitRecord};
use visitlog_form::{FormController, HistoryView};
use visitlog_store::{MemoryStore, OrderBy, RecordStore, StoreError};

/// Build a controller and its history view over `store`.
pub fn controller_with(
    store: Arc<dyn RecordStore>,
    policy: ResetPolicy,
) -> (FormController, Arc<HistoryView>) {
    let history = Arc::new(HistoryView::new(
        Arc::clone(&store),
        RenderOptions::with_offset_minutes(0),
    ));
    let controller = FormController::new(store, Arc::clone(&history), policy);
    (controller, history)
}

/// Fill the draft the way an operator would for a quote submission.
pub fn fill_quote(controller: &FormController) {
    controller.set_field(DraftField::StaffName, "A").unwrap();
    controller.set_field(DraftField::CustomerName, "B Corp").unwrap();
    controller.set_category("商談・見積").unwrap();
    controller
        .set_field(DraftField::SubCategory, "見積書の提出")
        .unwrap();
    controller.set_field(DraftField::Item1, "¥100,000").unwrap();
    controller.set_field(DraftField::Content, "見積書を手渡し").unwrap();
}

pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

/// Store whose inserts wait until released, recording every payload.
#[derive(Default)]
pub struct GatedStore {
    pub inner: MemoryStore,
    pub inserted: Mutex<Vec<NewVisit>>,
    pub entered: Notify,
    pub release: Notify,
}

#[async_trait]
impl RecordStore for GatedStore {
    async fn list(&self, table: &str, order: &OrderBy) -> Result<Vec<VisitRecord>, StoreError> {
        self.inner.list(table, order).await
    }

    async fn insert(&self, table: &str, visit: &NewVisit) -> Result<(), StoreError> {
        self.inserted.lock().await.push(visit.clone());
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.insert(table, visit).await
    }
}

/// Store whose `list` calls return prepared results in order, ignoring any
/// inserts. With `hold_first`, the first `list` waits for `release` after
/// taking its result, so a later call can finish before it.
#[derive(Default)]
pub struct ScriptedStore {
    pub responses: Mutex<VecDeque<Vec<VisitRecord>>>,
    pub hold_first: bool,
    pub list_calls: AtomicUsize,
    pub entered: Notify,
    pub release: Notify,
}

impl ScriptedStore {
    pub fn new(responses: Vec<Vec<VisitRecord>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    pub fn holding_first(responses: Vec<Vec<VisitRecord>>) -> Self {
        Self {
            hold_first: true,
            ..Self::new(responses)
        }
    }
}

#[async_trait]
impl RecordStore for ScriptedStore {
    async fn list(&self, _table: &str, _order: &OrderBy) -> Result<Vec<VisitRecord>, StoreError> {
        let call = self.list_calls.fetch_add(1, Ordering::SeqCst);
        let rows = self.responses.lock().await.pop_front().unwrap_or_default();
        if self.hold_first && call == 0 {
            self.entered.notify_one();
            self.release.notified().await;
        }
        Ok(rows)
    }

    async fn insert(&self, _table: &str, _visit: &NewVisit) -> Result<(), StoreError> {
        Ok(())
    }
}
