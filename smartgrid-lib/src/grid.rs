//! The grid: columns, rows, preferences, selection and editing in one place.
//!
//! [`SmartGrid`] owns everything one table on screen needs. It is headless:
//! the host feeds it events (search text, header clicks, key presses) and
//! draws what [`render_row`](SmartGrid::render_row) and
//! [`layout`](SmartGrid::layout) return.

use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::watch;

use crate::cell::click_cell;
use crate::cell::render_cell;
use crate::cell::CellUpdate;
use crate::cell::CellUpdateHandler;
use crate::cell::CellView;
use crate::cell::EditKey;
use crate::cell::EditOutcome;
use crate::cell::EditSession;
use crate::cell::InputKind;
use crate::cell::SubRowListener;
use crate::columns;
use crate::columns::ColumnEntry;
use crate::config::GridConfig;
use crate::error::EditError;
use crate::error::ExportError;
use crate::export::ExportFormat;
use crate::export::Exporter;
use crate::layout::AllocatedWidth;
use crate::layout::WidthAllocator;
use crate::model::ColumnDef;
use crate::model::ColumnSet;
use crate::model::Row;
use crate::pipeline::DataPipeline;
use crate::pipeline::FilterPredicate;
use crate::pipeline::PipelineQuery;
use crate::pipeline::SortDirection;
use crate::pipeline::SortSpec;
use crate::preferences::GridPreferences;
use crate::preferences::PreferencesPersistence;
use crate::preferences::PreferencesStore;
use crate::selection::Selection;
use crate::source::FetchRequest;
use crate::source::FetchedPage;
use crate::source::RowSource;

/// One rendered cell.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCell {
    pub key: String,
    pub view: CellView,
}

/// One rendered row of the current view.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    /// Index in the current view.
    pub index: usize,
    pub selected: bool,
    /// Main-row cells in display order.
    pub cells: Vec<RenderedCell>,
    /// Sub-row cells; empty when no column sits in the sub-row.
    pub sub_row: Vec<RenderedCell>,
}

/// One column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: String,
    /// Custom header or column label.
    pub label: String,
    pub sortable: bool,
    /// Direction if the grid is sorted by this column.
    pub sort: Option<SortDirection>,
    /// An active filter is set on this column.
    pub filtered: bool,
}

/// A self-contained data grid instance.
pub struct SmartGrid {
    config: GridConfig,
    source: RowSource,
    store: PreferencesStore,
    allocator: WidthAllocator,
    search: String,
    selection: Selection,
    page: usize,
    fetched: FetchedPage,
    /// Post-pipeline indices into the current row set.
    view: Vec<usize>,
    edit: Option<EditSession>,
    update_handler: Option<Arc<dyn CellUpdateHandler>>,
    sub_row_listener: Option<Arc<dyn SubRowListener>>,
}

impl SmartGrid {
    /// Creates a grid. Call [`mount`](Self::mount) before use to load
    /// preferences and, for remote sources, the first page.
    pub fn new(
        config: GridConfig,
        columns: ColumnSet,
        source: RowSource,
        persistence: Arc<dyn PreferencesPersistence>,
    ) -> Self {
        let store = PreferencesStore::new(config.preferences_key.clone(), columns, persistence);
        let mut grid = Self {
            allocator: WidthAllocator::new(config.widths.clone()),
            selection: Selection::new(config.selection_mode),
            config,
            source,
            store,
            search: String::new(),
            page: 0,
            fetched: FetchedPage::empty(),
            view: Vec::new(),
            edit: None,
            update_handler: None,
            sub_row_listener: None,
        };
        grid.recompute();
        grid
    }

    /// Sets the receiver of committed cell edits.
    pub fn with_update_handler(mut self, handler: Arc<dyn CellUpdateHandler>) -> Self {
        self.update_handler = Some(handler);
        self
    }

    /// Sets the receiver of sub-row toggles.
    pub fn with_sub_row_listener(mut self, listener: Arc<dyn SubRowListener>) -> Self {
        self.sub_row_listener = Some(listener);
        self
    }

    /// Loads persisted preferences and, for remote sources, the first page.
    pub async fn mount(&mut self) {
        self.store.load().await;
        log::debug!("mounted grid '{}'", self.config.preferences_key);
        self.refresh().await;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn columns(&self) -> &ColumnSet {
        self.store.columns()
    }

    pub fn preferences(&self) -> &GridPreferences {
        self.store.preferences()
    }

    /// Subscribes to preference changes.
    pub fn subscribe(&self) -> watch::Receiver<GridPreferences> {
        self.store.subscribe()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The in-progress cell edit, if any.
    pub fn editing(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// Current row set before search, filters and sort.
    fn rows(&self) -> &[Row] {
        match &self.source {
            RowSource::Local(rows) => rows,
            RowSource::Remote(_) => self.fetched.rows(),
        }
    }

    // =========================================================================
    // Data
    // =========================================================================

    /// Replaces the rows with a local row set.
    ///
    /// Selected indices past the end of the new view are dropped; any open
    /// edit is discarded.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.source = RowSource::Local(rows);
        self.edit = None;
        self.recompute();
        self.selection.retain_below(self.view.len());
    }

    /// Replaces the row source and reloads.
    pub async fn set_source(&mut self, source: RowSource) {
        self.source = source;
        self.page = 0;
        self.reset_view_state();
        self.refresh().await;
    }

    /// Replaces the column set and reconciles preferences with it.
    pub async fn set_columns(&mut self, columns: ColumnSet) {
        self.store.set_columns(columns).await;
        self.edit = None;
        self.recompute();
    }

    /// Re-fetches the current page of a remote source and reruns the
    /// pipeline.
    ///
    /// A failed fetch is logged and leaves an empty page.
    pub async fn refresh(&mut self) {
        if let RowSource::Remote(fetcher) = &self.source {
            let request = self.fetch_request();
            log::debug!(
                "fetching page {} (size {}) for grid '{}'",
                request.page,
                request.page_size,
                self.config.preferences_key
            );
            self.fetched = match fetcher.fetch(request).await {
                Ok(page) => page,
                Err(e) => {
                    log::warn!(
                        "fetch failed for grid '{}', showing no rows: {}",
                        self.config.preferences_key,
                        e
                    );
                    FetchedPage::empty()
                }
            };
        }
        self.recompute();
    }

    fn fetch_request(&self) -> FetchRequest {
        let prefs = self.store.preferences();
        FetchRequest {
            page: self.page,
            page_size: self.page_size(),
            search: self.search.trim().to_string(),
            filters: prefs.filters.iter().filter(|f| f.is_active()).cloned().collect(),
            sort: prefs.sort.clone(),
        }
    }

    /// Reruns search, filters and sort over the current row set. Remote
    /// pages arrive already shaped and are shown as they are.
    fn recompute(&mut self) {
        if self.source.is_remote() {
            self.view = (0..self.fetched.rows().len()).collect();
            return;
        }
        let prefs = self.store.preferences();
        let query = PipelineQuery {
            search: self.search.clone(),
            client_search: !self.config.server_side_search,
            filters: prefs.filters.clone(),
            sort: prefs.sort.clone(),
        };
        self.view = DataPipeline::apply_indices(self.rows(), self.store.columns(), &query);

        let pages = self.page_count();
        if self.page >= pages {
            self.page = pages.saturating_sub(1);
        }
    }

    /// Clears state that refers to view positions.
    fn reset_view_state(&mut self) {
        self.selection.clear();
        self.edit = None;
    }

    // =========================================================================
    // Search, sort, filter
    // =========================================================================

    /// Sets the global search text. Clears the selection and returns to the
    /// first page.
    pub async fn set_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.search {
            return;
        }
        self.search = text;
        self.page = 0;
        self.reset_view_state();
        self.reload().await;
    }

    /// Cycles the sort on a header click: a new column sorts ascending, the
    /// current column flips direction.
    ///
    /// Returns the new sort, or `None` if the column is not sortable.
    pub async fn toggle_sort(&mut self, column_key: &str) -> Option<SortSpec> {
        if !self.columns().get(column_key).is_some_and(|c| c.sortable) {
            return None;
        }
        let sort = SortSpec::toggle(self.preferences().sort.as_ref(), column_key);
        self.store.set_sort(Some(sort.clone())).await;
        self.page = 0;
        self.reset_view_state();
        self.reload().await;
        Some(sort)
    }

    /// Sets the filter on the predicate's column, replacing any previous one.
    /// A blank predicate removes the filter.
    pub async fn set_filter(&mut self, filter: FilterPredicate) {
        if filter.is_active() {
            self.store.upsert_filter(filter).await;
        } else {
            self.store.remove_filter(&filter.column).await;
        }
        self.page = 0;
        self.reset_view_state();
        self.reload().await;
    }

    /// Removes the filter on a column.
    pub async fn clear_filter(&mut self, column_key: &str) {
        self.store.remove_filter(column_key).await;
        self.page = 0;
        self.reset_view_state();
        self.reload().await;
    }

    /// Removes every filter.
    pub async fn clear_filters(&mut self) {
        self.store.set_filters(Vec::new()).await;
        self.page = 0;
        self.reset_view_state();
        self.reload().await;
    }

    /// Refetches for remote sources, reruns the pipeline for local ones.
    async fn reload(&mut self) {
        if self.source.is_remote() {
            self.refresh().await;
        } else {
            self.recompute();
        }
    }

    // =========================================================================
    // Paging
    // =========================================================================

    /// Rows per page: the user's choice, else the configured default.
    pub fn page_size(&self) -> usize {
        self.preferences()
            .page_size
            .unwrap_or(self.config.page_size)
            .max(1)
    }

    /// Zero-based current page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Number of rows across all pages.
    pub fn total_count(&self) -> usize {
        match self.source {
            RowSource::Local(_) => self.view.len(),
            RowSource::Remote(_) => self.fetched.total_count(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.total_count().div_ceil(self.page_size())
    }

    /// Moves to `page`, clamped to the last page.
    pub async fn set_page(&mut self, page: usize) {
        let page = page.min(self.page_count().saturating_sub(1));
        if page == self.page {
            return;
        }
        self.page = page;
        if self.source.is_remote() {
            self.reset_view_state();
            self.refresh().await;
        }
    }

    /// Changes the page size and returns to the first page.
    pub async fn set_page_size(&mut self, page_size: usize) {
        self.store.set_page_size(page_size).await;
        self.page = 0;
        self.reload().await;
    }

    // =========================================================================
    // View
    // =========================================================================

    /// Every row that survives search and filters, in sort order.
    ///
    /// For remote sources this is the current page only.
    pub fn visible_rows(&self) -> Vec<&Row> {
        let rows = self.rows();
        self.view.iter().map(|&i| &rows[i]).collect()
    }

    /// View index of the first row on the current page.
    pub fn page_offset(&self) -> usize {
        match self.source {
            RowSource::Local(_) => self.page * self.page_size(),
            RowSource::Remote(_) => 0,
        }
    }

    /// Rows of the current page.
    pub fn page_rows(&self) -> Vec<&Row> {
        let rows = self.rows();
        self.view
            .iter()
            .skip(self.page_offset())
            .take(self.page_size())
            .map(|&i| &rows[i])
            .collect()
    }

    /// Row at a view index.
    pub fn row(&self, index: usize) -> Option<&Row> {
        let i = *self.view.get(index)?;
        self.rows().get(i)
    }

    /// Main-row columns in display order.
    pub fn visible_columns(&self) -> Vec<&ColumnDef> {
        columns::visible_columns(self.store.columns(), self.store.preferences())
    }

    /// Sub-row columns in sub-row order.
    pub fn sub_row_columns(&self) -> Vec<&ColumnDef> {
        columns::sub_row_columns(self.store.columns(), self.store.preferences())
    }

    /// Headers of the main-row columns.
    pub fn headers(&self) -> Vec<HeaderCell> {
        let prefs = self.store.preferences();
        self.visible_columns()
            .into_iter()
            .map(|c| HeaderCell {
                key: c.key.clone(),
                label: columns::header_label(c, prefs).to_string(),
                sortable: c.sortable,
                sort: prefs
                    .sort
                    .as_ref()
                    .filter(|s| s.column == c.key)
                    .map(|s| s.direction),
                filtered: prefs
                    .filters
                    .iter()
                    .any(|f| f.column == c.key && f.is_active()),
            })
            .collect()
    }

    /// Pixel widths for the main-row columns in a container of the given
    /// width.
    pub fn layout(&self, container_width: u32) -> Vec<AllocatedWidth> {
        let overrides: HashMap<String, u32> = self
            .preferences()
            .column_widths
            .iter()
            .map(|(k, &w)| (k.clone(), w))
            .collect();
        self.allocator
            .allocate(&self.visible_columns(), &overrides, container_width)
    }

    /// Renders the row at a view index. A cell under edit renders as its
    /// input box with the text typed so far.
    pub fn render_row(&self, index: usize) -> Option<RenderedRow> {
        let row = self.row(index)?;
        let render = |column: &ColumnDef| {
            let view = match &self.edit {
                Some(edit) if edit.row_index() == index && edit.field() == column.key => {
                    CellView::Input {
                        text: edit.text().to_string(),
                        kind: input_kind(column),
                    }
                }
                _ => render_cell(column, row.get(&column.key)),
            };
            RenderedCell {
                key: column.key.clone(),
                view,
            }
        };
        Some(RenderedRow {
            index,
            selected: self.selection.is_selected(index),
            cells: self.visible_columns().into_iter().map(render).collect(),
            sub_row: self.sub_row_columns().into_iter().map(render).collect(),
        })
    }

    /// Renders every row of the current page.
    pub fn render_page(&self) -> Vec<RenderedRow> {
        let start = self.page_offset();
        let end = (start + self.page_size()).min(self.view.len());
        (start..end).filter_map(|i| self.render_row(i)).collect()
    }

    // =========================================================================
    // Cells
    // =========================================================================

    /// Forwards a click to the column's click capability. Returns `false`
    /// if the cell does not exist or is not clickable.
    pub fn click(&self, index: usize, column_key: &str) -> bool {
        match (self.row(index), self.columns().get(column_key)) {
            (Some(row), Some(column)) => click_cell(column, row),
            _ => false,
        }
    }

    /// Starts editing a cell, discarding any other open edit.
    pub fn begin_edit(&mut self, index: usize, column_key: &str) -> Result<(), EditError> {
        let row = self
            .row(index)
            .ok_or(EditError::RowOutOfRange { index })?;
        let column = self
            .columns()
            .get(column_key)
            .ok_or_else(|| EditError::NotEditable {
                field: column_key.to_string(),
            })?;
        let session = EditSession::begin(index, column, row)?;
        self.edit = Some(session);
        Ok(())
    }

    /// Replaces the text of the open edit.
    pub fn edit_input(&mut self, text: impl Into<String>) -> Result<(), EditError> {
        let edit = self.edit.as_mut().ok_or(EditError::NoSession)?;
        edit.input(text);
        Ok(())
    }

    /// Discards the open edit.
    pub fn cancel_edit(&mut self) {
        if let Some(edit) = self.edit.take() {
            edit.cancel();
        }
    }

    /// Commits the open edit and hands the update to the update handler.
    ///
    /// On a coercion or validation error the session stays open. The grid's
    /// own rows are left untouched; the handler is expected to feed updated
    /// rows back through [`set_rows`](Self::set_rows) or a refresh. A failing
    /// handler is logged.
    pub async fn commit_edit(&mut self) -> Result<CellUpdate, EditError> {
        let edit = self.edit.as_mut().ok_or(EditError::NoSession)?;
        let update = edit.commit()?;
        self.edit = None;

        if let Some(handler) = &self.update_handler {
            if let Err(e) = handler.on_cell_update(update.clone()).await {
                log::warn!(
                    "update handler failed for '{}' in row {}: {}",
                    update.field,
                    update.row_index,
                    e
                );
            }
        }
        Ok(update)
    }

    /// Routes a key press to the open edit. Returns `None` if nothing is
    /// being edited.
    pub async fn handle_edit_key(&mut self, key: EditKey) -> Option<EditOutcome> {
        self.edit.as_ref()?;
        match key {
            EditKey::Enter => Some(match self.commit_edit().await {
                Ok(update) => EditOutcome::Committed(update),
                Err(err) => EditOutcome::Rejected(err),
            }),
            EditKey::Escape => {
                self.cancel_edit();
                Some(EditOutcome::Cancelled)
            }
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Toggles selection of the row at a view index.
    pub fn toggle_select(&mut self, index: usize) -> bool {
        index < self.view.len() && self.selection.toggle(index)
    }

    /// Selects every row in the view (multi-select only).
    pub fn select_all(&mut self) -> bool {
        self.selection.select_all(self.view.len())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected rows in view order.
    pub fn selected_rows(&self) -> Vec<&Row> {
        self.selection.indices().filter_map(|i| self.row(i)).collect()
    }

    // =========================================================================
    // Column manager
    // =========================================================================

    /// Column manager entries in display order.
    pub fn column_entries(&self) -> Vec<ColumnEntry> {
        columns::manager_entries(self.store.columns(), self.store.preferences())
    }

    /// Column manager entries matching a search query.
    pub fn search_column_entries(&self, query: &str) -> Vec<ColumnEntry> {
        columns::search_columns(&self.column_entries(), self.store.columns(), query)
    }

    pub async fn move_column(&mut self, from: usize, to: usize) {
        self.store.move_column(from, to).await;
    }

    pub async fn update_column_order(&mut self, order: Vec<String>) {
        self.store.update_column_order(order).await;
    }

    /// Hides or shows a column. Returns `true` if it is hidden afterwards.
    pub async fn toggle_column_visibility(&mut self, column_key: &str) -> bool {
        self.store.toggle_column_visibility(column_key).await
    }

    pub async fn show_all_columns(&mut self) {
        self.store.show_all_columns().await;
    }

    pub async fn hide_all_columns(&mut self) {
        self.store.hide_all_columns().await;
    }

    pub async fn update_column_width(&mut self, column_key: &str, width: u32) {
        self.store.update_column_width(column_key, width).await;
    }

    pub async fn update_column_header(&mut self, column_key: &str, header: &str) {
        self.store.update_column_header(column_key, header).await;
    }

    /// Moves a column into or out of the sub-row and notifies the sub-row
    /// listener. Returns `None` if the column is not sub-row eligible.
    pub async fn toggle_sub_row(&mut self, column_key: &str) -> Option<bool> {
        let in_sub_row = self.store.toggle_sub_row(column_key).await?;
        if let Some(listener) = &self.sub_row_listener {
            listener.on_sub_row_toggle(column_key, in_sub_row);
        }
        Some(in_sub_row)
    }

    pub async fn update_sub_row_column_order(&mut self, order: Vec<String>) {
        self.store.update_sub_row_column_order(order).await;
    }

    /// Discards all customizations, filters and sort included.
    pub async fn reset_preferences(&mut self) {
        self.store.reset().await;
        self.page = 0;
        self.reset_view_state();
        self.reload().await;
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Visible columns with custom headers applied as labels.
    fn export_columns(&self) -> Vec<ColumnDef> {
        let prefs = self.store.preferences();
        self.visible_columns()
            .into_iter()
            .chain(self.sub_row_columns())
            .map(|c| {
                let mut column = c.clone();
                column.label = columns::header_label(c, prefs).to_string();
                column
            })
            .collect()
    }

    /// Renders the current view (all pages, visible columns) in memory.
    pub fn export_bytes(&self, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        let columns = self.export_columns();
        let rows: Vec<Row> = self.visible_rows().into_iter().cloned().collect();
        Exporter::new(columns.iter().collect(), &rows)
            .with_sheet_name(self.config.sheet_name.clone())
            .bytes(format)
    }

    /// Writes the current view into `dir`, named after the configured
    /// export file stem. Returns the path written.
    pub fn export(&self, format: ExportFormat, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        let columns = self.export_columns();
        let rows: Vec<Row> = self.visible_rows().into_iter().cloned().collect();
        let path = dir.as_ref().join(&self.config.export_file_stem);
        Exporter::new(columns.iter().collect(), &rows)
            .with_sheet_name(self.config.sheet_name.clone())
            .write(format, path)
    }
}

fn input_kind(column: &ColumnDef) -> InputKind {
    if column.column_type.is_numeric() {
        InputKind::Number
    } else if column.column_type.is_date() {
        InputKind::Date
    } else {
        InputKind::Text
    }
}

impl std::fmt::Debug for SmartGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmartGrid")
            .field("key", &self.config.preferences_key)
            .field("source", &self.source)
            .field("search", &self.search)
            .field("page", &self.page)
            .field("view", &self.view.len())
            .finish_non_exhaustive()
    }
}
