use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /visits
///
/// Fetch the visit history from the store, newest first, and return the
/// rendered entries.
pub async fn list_visits(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let entries = state.history.refresh().await?;
    Ok(Json(DataResponse { data: entries }))
}
