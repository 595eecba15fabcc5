//! Route definitions for the form schema.
//!
//! Mounted at `/schema` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::schema;
use crate::state::AppState;

/// Schema routes.
///
/// ```text
/// GET    /                   -> get_schema
/// GET    /labels             -> get_labels (?category, sub_category)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(schema::get_schema))
        .route("/labels", get(schema::get_labels))
}
