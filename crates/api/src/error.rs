use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use visitlog_core::error::CoreError;
use visitlog_form::FormError;
use visitlog_store::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`], [`FormError`] and [`StoreError`] and adds
/// a bad-request variant for malformed input. Implements [`IntoResponse`] to produce consistent
/// JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `visitlog_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A form controller error from `visitlog_form`.
    #[error(transparent)]
    Form(#[from] FormError),

    /// A record store error from `visitlog_store`.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),

            AppError::Form(form) => match form {
                FormError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                FormError::Busy => (
                    StatusCode::CONFLICT,
                    "SUBMISSION_IN_PROGRESS",
                    form.to_string(),
                ),
                FormError::Schema(core) => classify_core_error(core),
                FormError::Store(store) => classify_store_error(store),
            },

            AppError::Store(store) => classify_store_error(store),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::UnknownCategory(_) | CoreError::UnknownSubcategory { .. } => {
            (StatusCode::BAD_REQUEST, "UNKNOWN_CATEGORY", err.to_string())
        }
    }
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// - Store unreachable (not configured, network failure) maps to 503.
/// - Anything the store itself rejected maps to 502.
///
/// The store's message is passed through unchanged so the operator sees
/// exactly why the save or fetch failed.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    tracing::warn!(error = %err, "Record store error");
    if err.is_connectivity() {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "STORE_UNREACHABLE",
            err.to_string(),
        )
    } else {
        (StatusCode::BAD_GATEWAY, "STORE_ERROR", err.to_string())
    }
}
