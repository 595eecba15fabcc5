//! Store connection settings.

/// Default HTTP timeout for a single store call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Remote store endpoint and public access key.
///
/// Both values are optional: a missing endpoint or key does not stop the
/// process, it makes every store call fail with
/// [`StoreError::NotConfigured`](crate::StoreError::NotConfigured).
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Project URL, e.g. `https://xyzcompany.supabase.co`.
    pub url: Option<String>,
    /// Public (anon) API key.
    pub anon_key: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var              | Fallback                         | Default |
    /// |----------------------|----------------------------------|---------|
    /// | `SUPABASE_URL`       | `NEXT_PUBLIC_SUPABASE_URL`       | none    |
    /// | `SUPABASE_ANON_KEY`  | `NEXT_PUBLIC_SUPABASE_ANON_KEY`  | none    |
    /// | `STORE_TIMEOUT_SECS` |                                  | `10`    |
    pub fn from_env() -> Self {
        let url = first_non_empty(&["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"]);
        let anon_key = first_non_empty(&["SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"]);

        let timeout_secs: u64 = std::env::var("STORE_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("STORE_TIMEOUT_SECS must be a valid u64");

        if url.is_none() || anon_key.is_none() {
            tracing::warn!("Record store endpoint or key not set; store calls will fail");
        }

        Self {
            url,
            anon_key,
            timeout_secs,
        }
    }

    /// Whether both the endpoint and the key are present.
    pub fn is_complete(&self) -> bool {
        self.url.is_some() && self.anon_key.is_some()
    }
}

fn first_non_empty(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| std::env::var(k).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}
