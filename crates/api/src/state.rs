use std::sync::Arc;
use std::time::Duration;

use visitlog_form::HistoryView;
use visitlog_store::RecordStore;

use crate::config::ServerConfig;
use crate::sessions::SessionRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Remote record store, injected so tests can substitute an in-memory one.
    pub store: Arc<dyn RecordStore>,
    /// Visit history shared by the list endpoint and post-submit refreshes.
    pub history: Arc<HistoryView>,
    /// Open form sessions.
    pub sessions: Arc<SessionRegistry>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, config: ServerConfig) -> Self {
        let history = Arc::new(HistoryView::new(
            Arc::clone(&store),
            config.render_options(),
        ));
        Self {
            store,
            history,
            sessions: Arc::new(SessionRegistry::new(
                Duration::from_secs(config.session_idle_timeout_secs),
                config.max_sessions,
            )),
            config: Arc::new(config),
        }
    }
}
