/// Errors from the remote record store.
///
/// Every variant is a store-side failure: the caller reports it to the user
/// and does not retry.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Endpoint or access key missing from the environment.
    #[error("Record store is not configured ({0} is missing)")]
    NotConfigured(&'static str),

    /// The HTTP request itself failed (network, DNS, TLS, timeout, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store answered with a non-2xx status. `message` is the store's
    /// own error text and is shown to the user as-is.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        message: String,
    },

    /// The store refused the call for a reason of its own.
    #[error("Record store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether the failure happened before the store was reached.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, StoreError::NotConfigured(_) | StoreError::Request(_))
    }
}
