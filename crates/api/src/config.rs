use visitlog_core::draft::ResetPolicy;
use visitlog_core::history::{RenderOptions, DEFAULT_DISPLAY_OFFSET_MINUTES};
use visitlog_core::staff;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// What a draft keeps after a successful submission.
    pub reset_policy: ResetPolicy,
    /// Names offered by the staff selector.
    pub staff_roster: Vec<String>,
    /// UTC offset used for history dates, in minutes (default: `540`).
    pub display_offset_minutes: i32,
    /// Sessions unused for this long are evicted (default: `1800`).
    pub session_idle_timeout_secs: u64,
    /// Upper bound on open sessions (default: `1000`).
    pub max_sessions: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                    |
    /// |------------------------------|----------------------------|
    /// | `HOST`                       | `0.0.0.0`                  |
    /// | `PORT`                       | `3000`                     |
    /// | `CORS_ORIGINS`               | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                       |
    /// | `DRAFT_RESET_POLICY`         | `keep`                     |
    /// | `STAFF_NAMES`                | `金城暁,兼次勇一`          |
    /// | `DISPLAY_UTC_OFFSET_MINUTES` | `540`                      |
    /// | `SESSION_IDLE_TIMEOUT_SECS`  | `1800`                     |
    /// | `MAX_SESSIONS`               | `1000`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let reset_policy: ResetPolicy = std::env::var("DRAFT_RESET_POLICY")
            .unwrap_or_else(|_| "keep".into())
            .parse()
            .expect("DRAFT_RESET_POLICY must be `keep` or `full`");

        let staff_roster = std::env::var("STAFF_NAMES")
            .map(|raw| staff::parse_roster(&raw))
            .unwrap_or_else(|_| staff::default_roster());

        let display_offset_minutes: i32 = std::env::var("DISPLAY_UTC_OFFSET_MINUTES")
            .unwrap_or_else(|_| DEFAULT_DISPLAY_OFFSET_MINUTES.to_string())
            .parse()
            .expect("DISPLAY_UTC_OFFSET_MINUTES must be a valid i32");

        let session_idle_timeout_secs: u64 = std::env::var("SESSION_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "1800".into())
            .parse()
            .expect("SESSION_IDLE_TIMEOUT_SECS must be a valid u64");

        let max_sessions: usize = std::env::var("MAX_SESSIONS")
            .unwrap_or_else(|_| "1000".into())
            .parse()
            .expect("MAX_SESSIONS must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            reset_policy,
            staff_roster,
            display_offset_minutes,
            session_idle_timeout_secs,
            max_sessions,
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::with_offset_minutes(self.display_offset_minutes)
    }
}
