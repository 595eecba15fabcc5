use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use visitlog_api::router::build_app_router;
use visitlog_api::config::ServerConfig;
use visitlog_api::sessions::start_session_sweeper;
use visitlog_api::state::AppState;
use visitlog_store::{StoreConfig, SupabaseStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "visitlog_api=debug,visitlog_form=debug,visitlog_store=debug,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        reset_policy = ?config.reset_policy,
        staff = config.staff_roster.len(),
        "Loaded server configuration"
    );

    // --- Record store ---
    let store_config = StoreConfig::from_env();
    let store = SupabaseStore::new(&store_config).expect("Failed to build record store client");
    tracing::info!(configured = store_config.is_complete(), "Record store client created");

    // --- App state ---
    let state = AppState::new(Arc::new(store), config.clone());
    let sessions = Arc::clone(&state.sessions);

    // --- Idle session sweep ---
    let sweeper_handle = start_session_sweeper(Arc::clone(&sessions));

    // --- Router ---
    let app = build_app_router(state);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    sweeper_handle.abort();
    tracing::info!("Session sweeper stopped");

    let open = sessions.count().await;
    tracing::info!(open_sessions = open, "Graceful shutdown complete; open drafts discarded");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
