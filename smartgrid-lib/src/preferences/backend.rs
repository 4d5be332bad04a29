//! Preferences backend trait.

use async_trait::async_trait;

use crate::error::PreferencesError;

/// Backend trait for raw preference storage.
///
/// Implementations handle byte storage and retrieval by key.
/// [`LocalPreferences`](super::LocalPreferences) wraps this with typed
/// serialization.
#[async_trait]
pub trait PreferencesBackend: Send + Sync {
    /// Get raw bytes for a key.
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, PreferencesError>;

    /// Set raw bytes for a key.
    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), PreferencesError>;

    /// Delete a key.
    async fn delete(&self, key: &str) -> Result<(), PreferencesError>;

    /// Get all keys matching a prefix.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, PreferencesError>;
}
