//! Per-grid user preferences: state, store and persistence.
//!
//! A [`PreferencesStore`] owns the [`GridPreferences`] of one grid instance
//! and saves them through a [`PreferencesPersistence`] after every change.
//! Two strategies ship with the crate:
//!
//! - [`LocalPreferences`]: bincode-encoded bytes in a [`PreferencesBackend`]
//!   ([`SqliteBackend`] on disk, [`MemoryBackend`] for tests and sessions),
//! - [`CallbackPersistence`]: caller-supplied async save/load callbacks, for
//!   preferences kept on a server.

mod backend;
mod memory;
mod model;
mod persistence;
mod sqlite;
mod store;

pub use backend::PreferencesBackend;
pub use memory::MemoryBackend;
pub use model::GridPreferences;
pub use persistence::*;
pub use sqlite::SqliteBackend;
pub use store::PreferencesStore;
