//! SQLite preferences backend with in-memory cache.
//!
//! This is the "local device storage" of the grid: one row per grid key in
//! a `grid_preferences` table, stamped with the time of the last save.

use std::path::Path;

use async_sqlite::Client;
use async_sqlite::ClientBuilder;
use async_sqlite::JournalMode;
use async_sqlite::rusqlite;
use async_sqlite::rusqlite::OptionalExtension;
use async_trait::async_trait;
use dashmap::DashMap;

use super::PreferencesBackend;
use crate::error::PreferencesError;

/// SQLite-backed preference storage with DashMap cache.
pub struct SqliteBackend {
    client: Client,
    cache: DashMap<String, Vec<u8>>,
}

impl SqliteBackend {
    /// Opens (or creates) a backend at the given path.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, PreferencesError> {
        let client = ClientBuilder::new()
            .path(path)
            .journal_mode(JournalMode::Wal)
            .open()
            .await?;
        Self::init(client).await
    }

    /// Opens an in-memory backend. Data is lost when it is dropped.
    pub async fn open_in_memory() -> Result<Self, PreferencesError> {
        let client = ClientBuilder::new().path(":memory:").open().await?;
        Self::init(client).await
    }

    /// Opens the backend at the platform default location, creating the
    /// data directory if needed.
    pub async fn open_default() -> Result<Self, PreferencesError> {
        let path = crate::paths::preferences_db().ok_or(PreferencesError::NoDataDir)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::open(path).await
    }

    async fn init(client: Client) -> Result<Self, PreferencesError> {
        client
            .conn(|conn| {
                conn.execute_batch(
                    "CREATE TABLE IF NOT EXISTS grid_preferences (
                        grid_key   TEXT PRIMARY KEY,
                        payload    BLOB NOT NULL,
                        updated_at INTEGER NOT NULL
                    );",
                )
            })
            .await?;
        log::debug!("preferences table ready");

        Ok(Self {
            client,
            cache: DashMap::new(),
        })
    }
}

#[async_trait]
impl PreferencesBackend for SqliteBackend {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, PreferencesError> {
        if let Some(hit) = self.cache.get(key) {
            return Ok(Some(hit.value().clone()));
        }

        let grid_key = key.to_string();
        let payload: Option<Vec<u8>> = self
            .client
            .conn(move |conn| {
                conn.query_row(
                    "SELECT payload FROM grid_preferences WHERE grid_key = ?1",
                    [&grid_key],
                    |row| row.get(0),
                )
                .optional()
            })
            .await?;

        if let Some(bytes) = &payload {
            self.cache.insert(key.to_string(), bytes.clone());
        }
        Ok(payload)
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), PreferencesError> {
        let grid_key = key.to_string();
        let payload = value.clone();
        self.client
            .conn(move |conn| {
                conn.execute(
                    "INSERT INTO grid_preferences (grid_key, payload, updated_at)
                     VALUES (?1, ?2, strftime('%s', 'now'))
                     ON CONFLICT(grid_key) DO UPDATE
                     SET payload = excluded.payload, updated_at = excluded.updated_at",
                    rusqlite::params![grid_key, payload],
                )
            })
            .await?;

        log::debug!("stored {} preference bytes under '{}'", value.len(), key);
        self.cache.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), PreferencesError> {
        let grid_key = key.to_string();
        self.client
            .conn(move |conn| {
                conn.execute(
                    "DELETE FROM grid_preferences WHERE grid_key = ?1",
                    [&grid_key],
                )
            })
            .await?;
        self.cache.remove(key);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, PreferencesError> {
        // substr instead of LIKE: grid keys may contain '_' or '%'.
        let prefix = prefix.to_string();
        let keys = self
            .client
            .conn(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT grid_key FROM grid_preferences
                     WHERE substr(grid_key, 1, length(?1)) = ?1
                     ORDER BY grid_key",
                )?;
                let keys = stmt.query_map([&prefix], |row| row.get::<_, String>(0))?;
                keys.collect::<Result<Vec<_>, _>>()
            })
            .await?;
        Ok(keys)
    }
}
