//! Visit form controller and history view.
//!
//! Both components are built over an injected [`RecordStore`]
//! (`visitlog_store`), so tests can substitute an in-memory or failing store.
//!
//! [`RecordStore`]: visitlog_store::RecordStore

pub mod controller;
pub mod error;
pub mod history;

pub use controller::{FormController, FormPhase, FormSnapshot, SubmitReceipt, SUBMIT_CONFIRMATION};
pub use error::FormError;
pub use history::HistoryView;
