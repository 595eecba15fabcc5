pub mod health;
pub mod schema;
pub mod sessions;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /schema                                          full category catalog
/// /schema/labels                                   item labels for a pair
///
/// /staff                                           staff roster
///
/// /sessions                                        open a form session (POST)
/// /sessions/{id}                                   get, close
/// /sessions/{id}/fields                            set one field (PUT)
/// /sessions/{id}/category                          switch category (PUT)
/// /sessions/{id}/submit                            submit the draft (POST)
///
/// /visits                                          history, newest first
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/schema", schema::router())
        .route("/staff", get(handlers::schema::list_staff))
        .nest("/sessions", sessions::router())
        .route("/visits", get(handlers::visits::list_visits))
}
