//! Remote fetch error types

/// Errors returned by a [`RowFetcher`](crate::source::RowFetcher).
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// The remote side returned an error response.
    #[error("Fetch failed with status {status}: {message}")]
    Remote {
        /// Status code reported by the gateway.
        status: u16,
        /// Error message.
        message: String,
    },
}

impl FetchError {
    /// Creates a new remote error.
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }
}
