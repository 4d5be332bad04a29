//! Per-instance preferences store.

use std::sync::Arc;

use tokio::sync::watch;

use super::GridPreferences;
use super::PreferencesPersistence;
use crate::model::ColumnSet;
use crate::pipeline::FilterPredicate;
use crate::pipeline::SortSpec;

/// Owns the preferences of one grid instance.
///
/// Every mutation is applied in memory, published to subscribers and then
/// persisted. Persistence failures are logged and otherwise ignored: a failed
/// load leaves the defaults in place, a failed save is dropped. Nothing here
/// returns an error to the caller.
///
/// Each grid constructs its own store with its own key, so several grids on
/// one screen never share state.
pub struct PreferencesStore {
    key: String,
    columns: ColumnSet,
    current: GridPreferences,
    persistence: Arc<dyn PreferencesPersistence>,
    tx: watch::Sender<GridPreferences>,
}

impl PreferencesStore {
    /// Creates a store holding defaults for `columns`. Call
    /// [`load`](Self::load) to pick up persisted preferences.
    pub fn new(
        key: impl Into<String>,
        columns: ColumnSet,
        persistence: Arc<dyn PreferencesPersistence>,
    ) -> Self {
        let current = GridPreferences::defaults(&columns);
        let (tx, _) = watch::channel(current.clone());
        Self {
            key: key.into(),
            columns,
            current,
            persistence,
            tx,
        }
    }

    /// Returns the instance key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the column set the store reconciles against.
    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    /// Returns the current preferences.
    pub fn preferences(&self) -> &GridPreferences {
        &self.current
    }

    /// Subscribes to preference changes.
    pub fn subscribe(&self) -> watch::Receiver<GridPreferences> {
        self.tx.subscribe()
    }

    /// Loads persisted preferences and merges them with the current columns.
    ///
    /// Falls back to defaults when nothing is stored or loading fails.
    pub async fn load(&mut self) -> &GridPreferences {
        let loaded = match self.persistence.load().await {
            Ok(Some(stored)) => {
                log::debug!("loaded preferences for grid '{}'", self.key);
                stored.merged(&self.columns)
            }
            Ok(None) => GridPreferences::defaults(&self.columns),
            Err(e) => {
                log::warn!(
                    "failed to load preferences for grid '{}', using defaults: {}",
                    self.key,
                    e
                );
                GridPreferences::defaults(&self.columns)
            }
        };
        self.current = loaded;
        self.publish();
        &self.current
    }

    /// Replaces the column set, e.g. when the host screen changes its
    /// columns, and reconciles the current preferences with it.
    pub async fn set_columns(&mut self, columns: ColumnSet) {
        self.columns = columns;
        let merged = self.current.clone().merged(&self.columns);
        self.replace(merged).await;
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    /// Sets the display order. Unknown keys are dropped and omitted columns
    /// are appended.
    pub async fn update_column_order(&mut self, new_order: Vec<String>) {
        let updated = GridPreferences {
            column_order: new_order,
            ..self.current.clone()
        }
        .merged(&self.columns);
        self.replace(updated).await;
    }

    /// Moves the column at display position `from` to position `to`.
    pub async fn move_column(&mut self, from: usize, to: usize) {
        self.mutate(|p| {
            if from >= p.column_order.len() || from == to {
                return false;
            }
            let key = p.column_order.remove(from);
            let to = to.min(p.column_order.len());
            p.column_order.insert(to, key);
            true
        })
        .await;
    }

    /// Hides a visible column or shows a hidden one.
    ///
    /// Mandatory and unknown columns are left untouched. Returns `true` if the
    /// column is hidden afterwards.
    pub async fn toggle_column_visibility(&mut self, column_id: &str) -> bool {
        let hideable = self
            .columns
            .get(column_id)
            .is_some_and(|c| !c.mandatory);
        self.mutate(|p| {
            if !hideable {
                return false;
            }
            if !p.hidden_columns.remove(column_id) {
                p.hidden_columns.insert(column_id.to_string());
            }
            true
        })
        .await;
        self.current.is_hidden(column_id)
    }

    /// Shows every column.
    pub async fn show_all_columns(&mut self) {
        self.mutate(|p| {
            let changed = !p.hidden_columns.is_empty();
            p.hidden_columns.clear();
            changed
        })
        .await;
    }

    /// Hides every column except mandatory ones.
    pub async fn hide_all_columns(&mut self) {
        let hideable: Vec<String> = self
            .columns
            .iter()
            .filter(|c| !c.mandatory)
            .map(|c| c.key.clone())
            .collect();
        self.mutate(|p| {
            let before = p.hidden_columns.len();
            p.hidden_columns.extend(hideable);
            p.hidden_columns.len() != before
        })
        .await;
    }

    /// Stores a width override for a column.
    pub async fn update_column_width(&mut self, column_id: &str, width: u32) {
        let known = self.columns.contains(column_id);
        self.mutate(|p| {
            known && p.column_widths.insert(column_id.to_string(), width) != Some(width)
        })
        .await;
    }

    /// Stores a custom header for a column. A blank header restores the
    /// column's own label.
    pub async fn update_column_header(&mut self, column_id: &str, header: &str) {
        let known = self.columns.contains(column_id);
        let header = header.trim().to_string();
        self.mutate(|p| {
            if !known {
                return false;
            }
            if header.is_empty() {
                p.column_headers.remove(column_id).is_some()
            } else {
                p.column_headers.insert(column_id.to_string(), header.clone())
                    != Some(header.clone())
            }
        })
        .await;
    }

    /// Moves a sub-row eligible column into or out of the sub-row.
    ///
    /// Returns `Some(true)` if the column is now in the sub-row, `Some(false)`
    /// if it left it, and `None` if the column is not eligible.
    pub async fn toggle_sub_row(&mut self, column_id: &str) -> Option<bool> {
        if !self.columns.get(column_id).is_some_and(|c| c.sub_row) {
            return None;
        }
        self.mutate(|p| {
            if p.sub_row_columns.remove(column_id) {
                p.sub_row_column_order.retain(|k| k != column_id);
            } else {
                p.sub_row_columns.insert(column_id.to_string());
                p.sub_row_column_order.push(column_id.to_string());
            }
            true
        })
        .await;
        Some(self.current.is_sub_row(column_id))
    }

    /// Sets the sub-row order. Keys outside the sub-row are dropped and
    /// omitted members are appended.
    pub async fn update_sub_row_column_order(&mut self, new_order: Vec<String>) {
        let updated = GridPreferences {
            sub_row_column_order: new_order,
            ..self.current.clone()
        }
        .merged(&self.columns);
        self.replace(updated).await;
    }

    /// Replaces all column filters.
    pub async fn set_filters(&mut self, filters: Vec<FilterPredicate>) {
        let filters: Vec<FilterPredicate> = filters
            .into_iter()
            .filter(|f| self.columns.contains(&f.column))
            .collect();
        self.mutate(|p| {
            p.filters = filters;
            true
        })
        .await;
    }

    /// Adds a filter, replacing any existing filter on the same column.
    pub async fn upsert_filter(&mut self, filter: FilterPredicate) {
        let known = self.columns.contains(&filter.column);
        self.mutate(|p| {
            if !known {
                return false;
            }
            match p.filters.iter_mut().find(|f| f.column == filter.column) {
                Some(existing) => *existing = filter,
                None => p.filters.push(filter),
            }
            true
        })
        .await;
    }

    /// Removes the filter on a column.
    pub async fn remove_filter(&mut self, column_id: &str) {
        self.mutate(|p| {
            let before = p.filters.len();
            p.filters.retain(|f| f.column != column_id);
            p.filters.len() != before
        })
        .await;
    }

    /// Sets or clears the sort.
    pub async fn set_sort(&mut self, sort: Option<SortSpec>) {
        let valid = sort
            .as_ref()
            .is_none_or(|s| self.columns.get(&s.column).is_some_and(|c| c.sortable));
        self.mutate(|p| {
            if !valid || p.sort == sort {
                return false;
            }
            p.sort = sort;
            true
        })
        .await;
    }

    /// Sets the page size. Zero is ignored.
    pub async fn set_page_size(&mut self, page_size: usize) {
        self.mutate(|p| {
            if page_size == 0 || p.page_size == Some(page_size) {
                return false;
            }
            p.page_size = Some(page_size);
            true
        })
        .await;
    }

    /// Discards every customization and persists the defaults.
    pub async fn reset(&mut self) {
        let defaults = GridPreferences::defaults(&self.columns);
        self.replace(defaults).await;
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Applies `f`; publishes and persists only if it reports a change.
    async fn mutate(&mut self, f: impl FnOnce(&mut GridPreferences) -> bool) {
        if f(&mut self.current) {
            self.publish();
            self.persist().await;
        }
    }

    async fn replace(&mut self, preferences: GridPreferences) {
        self.current = preferences;
        self.publish();
        self.persist().await;
    }

    fn publish(&self) {
        self.tx.send_replace(self.current.clone());
    }

    async fn persist(&self) {
        if let Err(e) = self.persistence.save(&self.current).await {
            log::warn!(
                "failed to save preferences for grid '{}': {}",
                self.key,
                e
            );
        }
    }
}

impl std::fmt::Debug for PreferencesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferencesStore")
            .field("key", &self.key)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}
