//! Handlers for form sessions.
//!
//! A session is one operator's form: open it, edit fields, switch category,
//! submit. Submission inserts the visit, resets the draft and returns the
//! refreshed history in one response.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use visitlog_core::draft::{DraftField, FormDraft, ResetPolicy};
use visitlog_core::error::CoreError;
use visitlog_core::history::HistoryEntry;
use visitlog_core::schema::ItemLabels;
use visitlog_form::{FormController, FormPhase};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body for `PUT /sessions/{id}/fields`.
#[derive(Debug, Deserialize)]
pub struct SetFieldRequest {
    pub field: String,
    pub value: String,
}

/// Body for `PUT /sessions/{id}/category`.
#[derive(Debug, Deserialize)]
pub struct SetCategoryRequest {
    pub category: String,
}

/// Draft fields under their wire names.
#[derive(Debug, Serialize)]
pub struct DraftView {
    pub staff_name: String,
    pub customer_name: String,
    pub category: &'static str,
    pub sub_category: &'static str,
    pub visit_type: String,
    pub content: String,
    pub item_1: String,
    pub item_2: String,
    pub item_3: String,
    pub item_4: String,
}

impl From<FormDraft> for DraftView {
    fn from(draft: FormDraft) -> Self {
        let category = draft.category().name();
        let sub_category = draft.sub_category().name();
        let [item_1, item_2, item_3, item_4] = draft.items;
        Self {
            staff_name: draft.staff_name,
            customer_name: draft.customer_name,
            category,
            sub_category,
            visit_type: draft.visit_type,
            content: draft.content,
            item_1,
            item_2,
            item_3,
            item_4,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub phase: FormPhase,
    pub reset_policy: ResetPolicy,
    pub labels: ItemLabels,
    pub draft: DraftView,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: &'static str,
    pub session: SessionResponse,
    pub history: Vec<HistoryEntry>,
    /// Present when the visit was saved but the history could not be reloaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_error: Option<String>,
}

fn session_response(id: Uuid, controller: &FormController) -> SessionResponse {
    let snapshot = controller.snapshot();
    SessionResponse {
        id,
        phase: snapshot.phase,
        reset_policy: controller.reset_policy(),
        labels: snapshot.draft.labels(),
        draft: snapshot.draft.into(),
    }
}

async fn find_session(state: &AppState, id: Uuid) -> AppResult<Arc<FormController>> {
    state.sessions.get(id).await.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Session",
            id: id.to_string(),
        })
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /sessions
///
/// Open a form session with a default draft.
pub async fn open_session(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let (id, controller) = state
        .sessions
        .open(
            Arc::clone(&state.store),
            Arc::clone(&state.history),
            state.config.reset_policy,
        )
        .await;

    tracing::info!(session_id = %id, "Form session opened");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: session_response(id, &controller),
        }),
    ))
}

/// GET /sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let controller = find_session(&state, id).await?;
    Ok(Json(DataResponse {
        data: session_response(id, &controller),
    }))
}

/// DELETE /sessions/{id}
pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    if !state.sessions.close(id).await {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id: id.to_string(),
        }));
    }
    tracing::info!(session_id = %id, "Form session closed");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /sessions/{id}/fields
///
/// Assign one draft field by wire name.
pub async fn set_field(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<SetFieldRequest>,
) -> AppResult<impl IntoResponse> {
    let field: DraftField = input
        .field
        .parse()
        .map_err(|e: CoreError| AppError::BadRequest(e.to_string()))?;

    let controller = find_session(&state, id).await?;
    controller.set_field(field, input.value)?;

    Ok(Json(DataResponse {
        data: session_response(id, &controller),
    }))
}

/// PUT /sessions/{id}/category
///
/// Switch category; the sub-category resets to the category's first entry.
pub async fn set_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<SetCategoryRequest>,
) -> AppResult<impl IntoResponse> {
    let controller = find_session(&state, id).await?;
    controller.set_category(&input.category)?;

    Ok(Json(DataResponse {
        data: session_response(id, &controller),
    }))
}

/// POST /sessions/{id}/submit
///
/// Submit the draft. On success the draft is reset and the refreshed
/// history is returned; on failure the draft is left untouched.
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let controller = find_session(&state, id).await?;
    let receipt = controller.submit().await?;

    tracing::info!(
        session_id = %id,
        history_len = receipt.history.len(),
        "Session draft submitted"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SubmitResponse {
                message: receipt.message,
                session: session_response(id, &controller),
                history: receipt.history,
                history_error: receipt.refresh_error.map(|e| e.to_string()),
            },
        }),
    ))
}
