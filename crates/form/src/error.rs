use visitlog_core::error::CoreError;
use visitlog_store::StoreError;

/// Errors from form and history operations.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// A required field is missing; the store was not called.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The draft is being submitted and cannot be edited or resubmitted.
    #[error("A submission is already in progress")]
    Busy,

    /// A category or sub-category name did not resolve against the schema.
    #[error(transparent)]
    Schema(CoreError),

    /// The store call failed. The message is the store's own.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<CoreError> for FormError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => FormError::Validation(msg),
            other => FormError::Schema(other),
        }
    }
}
