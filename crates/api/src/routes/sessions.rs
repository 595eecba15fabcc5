//! Route definitions for form sessions.
//!
//! Mounted at `/sessions` by `api_routes()`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;

/// Session routes.
///
/// ```text
/// POST   /                   -> open_session
/// GET    /{id}               -> get_session
/// DELETE /{id}               -> close_session
/// PUT    /{id}/fields        -> set_field
/// PUT    /{id}/category      -> set_category
/// POST   /{id}/submit        -> submit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(sessions::open_session))
        .route(
            "/{id}",
            get(sessions::get_session).delete(sessions::close_session),
        )
        .route("/{id}/fields", put(sessions::set_field))
        .route("/{id}/category", put(sessions::set_category))
        .route("/{id}/submit", post(sessions::submit))
}
