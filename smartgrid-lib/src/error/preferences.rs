//! Preferences persistence errors

/// Errors raised by preference backends and persistence strategies.
///
/// The [`PreferencesStore`](crate::preferences::PreferencesStore) never hands
/// these to its caller: a failed load falls back to defaults and a failed save
/// is dropped after being logged.
#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    /// The SQLite backend failed.
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),

    /// Encoding preferences failed.
    #[error("serialization error: {0}")]
    Serialization(bincode::Error),

    /// Decoding stored preferences failed.
    #[error("deserialization error: {0}")]
    Deserialization(bincode::Error),

    /// JSON payload exchanged with a callback was malformed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A caller-supplied save or load callback failed.
    #[error("preferences callback failed: {0}")]
    Callback(String),

    /// No local storage location could be determined.
    #[error("no data directory available for local preferences")]
    NoDataDir,

    /// Creating the storage directory failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PreferencesError {
    /// Creates a new callback error.
    pub fn callback(message: impl Into<String>) -> Self {
        Self::Callback(message.into())
    }
}
