//! Handlers for the form schema and staff roster.
//!
//! These are read-only lookups used to populate the form's selects and the
//! item labels.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use visitlog_core::schema::{self, ItemLabels};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for a label lookup.
#[derive(Debug, Deserialize)]
pub struct LabelsQuery {
    pub category: String,
    pub sub_category: String,
}

#[derive(Debug, Serialize)]
pub struct LabelsResponse {
    pub labels: ItemLabels,
    /// `true` when the pair did not resolve and placeholders were used.
    pub fallback: bool,
}

/// GET /schema
///
/// Full category catalog in declaration order.
pub async fn get_schema() -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: schema::schema_catalog(),
    }))
}

/// GET /schema/labels?category=&sub_category=
///
/// Item labels for a pair. Unknown pairs get placeholder labels, not an error.
pub async fn get_labels(Query(params): Query<LabelsQuery>) -> AppResult<impl IntoResponse> {
    let fallback = schema::labels(&params.category, &params.sub_category).is_err();
    let labels = schema::labels_or_placeholder(&params.category, &params.sub_category);
    Ok(Json(DataResponse {
        data: LabelsResponse { labels, fallback },
    }))
}

/// GET /staff
pub async fn list_staff(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: state.config.staff_roster.clone(),
    }))
}
