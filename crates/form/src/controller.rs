//! Visit form controller.
//!
//! Owns one [`FormDraft`] and moves it through two phases:
//!
//! ```text
//! Editing --submit()--> Submitting --insert ok/err--> Editing
//! ```
//!
//! Edits are only accepted while `Editing`. The draft lock is never held
//! across a store call, so a submission in flight is observable (edits and
//! a second submit get [`FormError::Busy`]) instead of queueing behind it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use visitlog_core::draft::{DraftField, FormDraft, ResetPolicy};
use visitlog_core::history::HistoryEntry;
use visitlog_core::schema::{Category, ItemLabels};
use visitlog_core::visit::VISITS_TABLE;
use visitlog_store::{RecordStore, StoreError};

use crate::error::FormError;
use crate::history::HistoryView;

/// Confirmation shown after a successful submission.
pub const SUBMIT_CONFIRMATION: &str = "保存しました！AI部長のフィードバックを生成中...";

/// Controller phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    #[default]
    Editing,
    Submitting,
}

/// Point-in-time copy of the controller state.
#[derive(Debug, Clone)]
pub struct FormSnapshot {
    pub draft: FormDraft,
    pub phase: FormPhase,
}

/// Result of a successful submission.
#[derive(Debug)]
pub struct SubmitReceipt {
    pub message: &'static str,
    /// History after the post-insert refresh, or the previous list if the
    /// refresh failed.
    pub history: Vec<HistoryEntry>,
    /// Set when the insert succeeded but the refresh did not.
    pub refresh_error: Option<StoreError>,
}

#[derive(Debug, Default)]
struct FormState {
    draft: FormDraft,
    phase: FormPhase,
}

pub struct FormController {
    store: Arc<dyn RecordStore>,
    history: Arc<HistoryView>,
    policy: ResetPolicy,
    state: Mutex<FormState>,
}

impl FormController {
    /// Create a controller with a default draft.
    pub fn new(store: Arc<dyn RecordStore>, history: Arc<HistoryView>, policy: ResetPolicy) -> Self {
        Self {
            store,
            history,
            policy,
            state: Mutex::new(FormState::default()),
        }
    }

    pub fn reset_policy(&self) -> ResetPolicy {
        self.policy
    }

    pub fn snapshot(&self) -> FormSnapshot {
        let state = self.lock();
        FormSnapshot {
            draft: state.draft.clone(),
            phase: state.phase,
        }
    }

    pub fn draft(&self) -> FormDraft {
        self.lock().draft.clone()
    }

    pub fn phase(&self) -> FormPhase {
        self.lock().phase
    }

    /// Labels for the item slots under the current selection.
    pub fn labels(&self) -> ItemLabels {
        self.lock().draft.labels()
    }

    /// Assign one draft field. No validation beyond schema membership for
    /// `category` / `sub_category`.
    pub fn set_field(&self, field: DraftField, value: impl Into<String>) -> Result<(), FormError> {
        let mut state = self.editing()?;
        state.draft.set_field(field, value.into())?;
        Ok(())
    }

    /// Switch category; the sub-category follows to the category's first
    /// entry in the same step.
    pub fn set_category(&self, category: &str) -> Result<(), FormError> {
        let mut state = self.editing()?;
        state.draft.set_category(Category::from_name(category)?);
        Ok(())
    }

    /// Validate and insert the draft, then reset it and refresh history.
    ///
    /// A missing staff or customer name fails before the store is called.
    /// A store failure leaves the draft exactly as it was.
    pub async fn submit(&self) -> Result<SubmitReceipt, FormError> {
        let visit = {
            let mut state = self.editing()?;
            let visit = state.draft.to_new_visit();
            visit.check_required()?;
            state.phase = FormPhase::Submitting;
            visit
        };
        let guard = PhaseGuard(&self.state);

        if let Err(e) = self.store.insert(VISITS_TABLE, &visit).await {
            tracing::warn!(customer = %visit.customer_name, error = %e, "Visit submission failed");
            return Err(FormError::Store(e));
        }
        self.lock().draft.reset(self.policy);
        drop(guard);

        tracing::info!(
            staff = %visit.staff_name,
            customer = %visit.customer_name,
            category = %visit.category,
            sub_category = %visit.sub_category,
            "Visit submitted"
        );

        let (history, refresh_error) = match self.history.refresh().await {
            Ok(entries) => (entries, None),
            Err(e) => (self.history.entries().await, Some(e)),
        };

        Ok(SubmitReceipt {
            message: SUBMIT_CONFIRMATION,
            history,
            refresh_error,
        })
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn editing(&self) -> Result<MutexGuard<'_, FormState>, FormError> {
        let state = self.lock();
        if state.phase == FormPhase::Submitting {
            return Err(FormError::Busy);
        }
        Ok(state)
    }
}

/// Returns the controller to `Editing` however the submission ends,
/// including when the submitting future is dropped mid-call.
struct PhaseGuard<'a>(&'a Mutex<FormState>);

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).phase = FormPhase::Editing;
    }
}
