//! Pluggable persistence for grid preferences.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use super::GridPreferences;
use super::PreferencesBackend;
use crate::error::PreferencesError;

/// Where a [`PreferencesStore`](super::PreferencesStore) loads and saves.
#[async_trait]
pub trait PreferencesPersistence: Send + Sync {
    /// Loads stored preferences, or `None` if nothing was saved yet.
    async fn load(&self) -> Result<Option<GridPreferences>, PreferencesError>;

    /// Saves preferences, replacing whatever was stored.
    async fn save(&self, preferences: &GridPreferences) -> Result<(), PreferencesError>;
}

/// Key prefix under which local preferences are stored.
pub const LOCAL_KEY_PREFIX: &str = "smartgrid.preferences.";

/// Preferences kept in a local key/value backend under a caller-supplied key.
///
/// Values are encoded with bincode.
#[derive(Clone)]
pub struct LocalPreferences {
    backend: Arc<dyn PreferencesBackend>,
    key: String,
}

impl LocalPreferences {
    /// Creates local persistence for the grid identified by `key`.
    pub fn new(backend: Arc<dyn PreferencesBackend>, key: impl AsRef<str>) -> Self {
        Self {
            backend,
            key: format!("{}{}", LOCAL_KEY_PREFIX, key.as_ref()),
        }
    }

    /// Returns the full storage key.
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Removes the stored preferences.
    pub async fn clear(&self) -> Result<(), PreferencesError> {
        self.backend.delete(&self.key).await
    }
}

#[async_trait]
impl PreferencesPersistence for LocalPreferences {
    async fn load(&self) -> Result<Option<GridPreferences>, PreferencesError> {
        match self.backend.get_bytes(&self.key).await? {
            Some(bytes) => Ok(Some(
                bincode::deserialize(&bytes).map_err(PreferencesError::Deserialization)?,
            )),
            None => Ok(None),
        }
    }

    async fn save(&self, preferences: &GridPreferences) -> Result<(), PreferencesError> {
        let bytes = bincode::serialize(preferences).map_err(PreferencesError::Serialization)?;
        self.backend.set_bytes(&self.key, bytes).await
    }
}

/// Lists the grid keys that have local preferences stored in `backend`.
pub async fn stored_grid_keys(
    backend: &dyn PreferencesBackend,
) -> Result<Vec<String>, PreferencesError> {
    let mut keys: Vec<String> = backend
        .keys_with_prefix(LOCAL_KEY_PREFIX)
        .await?
        .into_iter()
        .filter_map(|k| k.strip_prefix(LOCAL_KEY_PREFIX).map(str::to_string))
        .collect();
    keys.sort();
    Ok(keys)
}

type LoadFn =
    Box<dyn Fn() -> BoxFuture<'static, Result<Option<GridPreferences>, PreferencesError>> + Send + Sync>;
type SaveFn =
    Box<dyn Fn(GridPreferences) -> BoxFuture<'static, Result<(), PreferencesError>> + Send + Sync>;

/// Preferences saved and loaded through caller-supplied async callbacks.
///
/// This is how a host wires server-backed preferences.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use smartgrid_lib::preferences::{CallbackPersistence, GridPreferences};
///
/// let saved: Arc<Mutex<Option<GridPreferences>>> = Arc::default();
/// let load_slot = saved.clone();
/// let save_slot = saved.clone();
///
/// let persistence = CallbackPersistence::new(
///     move || {
///         let slot = load_slot.clone();
///         async move { Ok(slot.lock().unwrap().clone()) }
///     },
///     move |prefs| {
///         let slot = save_slot.clone();
///         async move {
///             *slot.lock().unwrap() = Some(prefs);
///             Ok(())
///         }
///     },
/// );
/// # let _ = persistence;
/// ```
pub struct CallbackPersistence {
    load: LoadFn,
    save: SaveFn,
}

impl CallbackPersistence {
    /// Creates persistence from typed load and save callbacks.
    pub fn new<L, LF, S, SF>(load: L, save: S) -> Self
    where
        L: Fn() -> LF + Send + Sync + 'static,
        LF: Future<Output = Result<Option<GridPreferences>, PreferencesError>> + Send + 'static,
        S: Fn(GridPreferences) -> SF + Send + Sync + 'static,
        SF: Future<Output = Result<(), PreferencesError>> + Send + 'static,
    {
        Self {
            load: Box::new(move || Box::pin(load())),
            save: Box::new(move |prefs| Box::pin(save(prefs))),
        }
    }

    /// Creates persistence from callbacks exchanging JSON documents, the shape
    /// a REST gateway returns.
    ///
    /// A `null` document loads as "nothing saved".
    pub fn json<L, LF, S, SF>(load: L, save: S) -> Self
    where
        L: Fn() -> LF + Send + Sync + 'static,
        LF: Future<Output = Result<serde_json::Value, PreferencesError>> + Send + 'static,
        S: Fn(serde_json::Value) -> SF + Send + Sync + 'static,
        SF: Future<Output = Result<(), PreferencesError>> + Send + 'static,
    {
        Self::new(
            move || {
                let fut = load();
                async move {
                    match fut.await? {
                        serde_json::Value::Null => Ok(None),
                        doc => Ok(Some(serde_json::from_value(doc)?)),
                    }
                }
            },
            move |prefs| {
                let fut = serde_json::to_value(&prefs).map(&save);
                async move { fut?.await }
            },
        )
    }
}

#[async_trait]
impl PreferencesPersistence for CallbackPersistence {
    async fn load(&self) -> Result<Option<GridPreferences>, PreferencesError> {
        (self.load)().await
    }

    async fn save(&self, preferences: &GridPreferences) -> Result<(), PreferencesError> {
        (self.save)(preferences.clone()).await
    }
}

/// Persistence that stores nothing. Every load returns `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPersistence;

#[async_trait]
impl PreferencesPersistence for NoPersistence {
    async fn load(&self) -> Result<Option<GridPreferences>, PreferencesError> {
        Ok(None)
    }

    async fn save(&self, _preferences: &GridPreferences) -> Result<(), PreferencesError> {
        Ok(())
    }
}

/// Loads through another persistence but never saves.
///
/// Changes made on a grid backed by this stay in memory for its lifetime.
#[derive(Clone)]
pub struct ReadOnlyPreferences {
    inner: Arc<dyn PreferencesPersistence>,
}

impl ReadOnlyPreferences {
    pub fn new(inner: Arc<dyn PreferencesPersistence>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl PreferencesPersistence for ReadOnlyPreferences {
    async fn load(&self) -> Result<Option<GridPreferences>, PreferencesError> {
        self.inner.load().await
    }

    async fn save(&self, _preferences: &GridPreferences) -> Result<(), PreferencesError> {
        log::trace!("read-only preferences, skipping save");
        Ok(())
    }
}
