//! Tests for the composed grid.

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use smartgrid_lib::GridConfig;
use smartgrid_lib::SmartGrid;
use smartgrid_lib::cell::CellUpdate;
use smartgrid_lib::cell::CellUpdateHandler;
use smartgrid_lib::cell::CellView;
use smartgrid_lib::cell::EditKey;
use smartgrid_lib::cell::EditOutcome;
use smartgrid_lib::cell::SubRowListener;
use smartgrid_lib::error::EditError;
use smartgrid_lib::error::FetchError;
use smartgrid_lib::error::UpdateError;
use smartgrid_lib::export::ExportFormat;
use smartgrid_lib::model::ColumnDef;
use smartgrid_lib::model::ColumnSet;
use smartgrid_lib::model::ColumnType;
use smartgrid_lib::model::FilterMode;
use smartgrid_lib::model::Row;
use smartgrid_lib::model::StyledValue;
use smartgrid_lib::pipeline::FilterPredicate;
use smartgrid_lib::pipeline::SortDirection;
use smartgrid_lib::pipeline::SortSpec;
use smartgrid_lib::preferences::LocalPreferences;
use smartgrid_lib::preferences::MemoryBackend;
use smartgrid_lib::preferences::NoPersistence;
use smartgrid_lib::preferences::PreferencesBackend;
use smartgrid_lib::preferences::PreferencesPersistence;
use smartgrid_lib::preferences::ReadOnlyPreferences;
use smartgrid_lib::selection::SelectionMode;
use smartgrid_lib::source::FetchRequest;
use smartgrid_lib::source::FetchedPage;
use smartgrid_lib::source::RowFetcher;
use smartgrid_lib::source::RowSource;

fn columns() -> ColumnSet {
    ColumnSet::new(vec![
        ColumnDef::new("id", "Id").mandatory().sortable(),
        ColumnDef::new("status", "Status")
            .with_type(ColumnType::Badge)
            .filterable(),
        ColumnDef::new("origin", "Origin").sortable().filterable(),
        ColumnDef::new("weight", "Weight")
            .with_type(ColumnType::EditableNumber)
            .sortable(),
        ColumnDef::new("wagons", "Wagons")
            .with_type(ColumnType::ExpandableCount)
            .sub_row(),
    ])
    .unwrap()
}

fn rows() -> Vec<Row> {
    (1..=7)
        .map(|i| {
            Row::new()
                .set("id", i)
                .set(
                    "status",
                    if i % 2 == 1 {
                        StyledValue::new("Open", "badge-blue")
                    } else {
                        StyledValue::new("Closed", "badge-red")
                    },
                )
                .set("origin", if i <= 3 { "Basel" } else { "Zurich" })
                .set("weight", i * 100)
                .set("wagons", vec![format!("W{i}a"), format!("W{i}b")])
        })
        .collect()
}

fn ids(rows: &[&Row]) -> Vec<String> {
    rows.iter().map(|r| r.get("id").display_text()).collect()
}

async fn local_grid(config: GridConfig) -> SmartGrid {
    let mut grid = SmartGrid::new(config, columns(), RowSource::Local(rows()), Arc::new(NoPersistence));
    grid.mount().await;
    grid
}

#[tokio::test]
async fn test_paging_over_filtered_view() {
    let mut grid = local_grid(GridConfig::new("g").with_page_size(3)).await;
    assert_eq!(grid.total_count(), 7);
    assert_eq!(grid.page_count(), 3);
    assert_eq!(ids(&grid.page_rows()), ["1", "2", "3"]);

    grid.set_page(2).await;
    assert_eq!(ids(&grid.page_rows()), ["7"]);

    grid.set_page(99).await;
    assert_eq!(grid.page(), 2);

    grid.set_filter(FilterPredicate::equals("status", "Open")).await;
    assert_eq!(grid.page(), 0);
    assert_eq!(ids(&grid.visible_rows()), ["1", "3", "5", "7"]);
    assert_eq!(grid.page_count(), 2);
}

#[tokio::test]
async fn test_sort_toggle_through_headers() {
    let mut grid = local_grid(GridConfig::new("g")).await;

    assert_eq!(grid.toggle_sort("weight").await, Some(SortSpec::asc("weight")));
    assert_eq!(grid.toggle_sort("weight").await, Some(SortSpec::desc("weight")));
    assert_eq!(ids(&grid.visible_rows())[0], "7");
    assert_eq!(grid.toggle_sort("status").await, None);

    let header = grid.headers().into_iter().find(|h| h.key == "weight").unwrap();
    assert_eq!(header.sort, Some(SortDirection::Desc));
}

#[tokio::test]
async fn test_search_and_filter_clear_selection() {
    let mut grid = local_grid(GridConfig::new("g").with_selection_mode(SelectionMode::Multi)).await;
    assert!(grid.toggle_select(0));
    assert!(grid.toggle_select(4));
    assert_eq!(ids(&grid.selected_rows()), ["1", "5"]);

    grid.set_search("zurich").await;
    assert!(grid.selected_rows().is_empty());
    assert_eq!(ids(&grid.visible_rows()), ["4", "5", "6", "7"]);

    grid.toggle_select(1);
    assert_eq!(ids(&grid.selected_rows()), ["5"]);
    grid.clear_filter("status").await;
    assert!(grid.selection().is_empty());

    assert!(!grid.toggle_select(42));
}

#[tokio::test]
async fn test_single_selection_mode() {
    let mut grid = local_grid(GridConfig::new("g").with_selection_mode(SelectionMode::Single)).await;
    grid.toggle_select(0);
    grid.toggle_select(2);
    assert_eq!(ids(&grid.selected_rows()), ["3"]);
    assert!(!grid.select_all());
}

#[tokio::test]
async fn test_render_row_and_sub_row() {
    let mut grid = local_grid(GridConfig::new("g")).await;
    let row = grid.render_row(0).unwrap();
    assert_eq!(row.cells.len(), 5);
    assert!(row.sub_row.is_empty());
    assert_eq!(
        row.cells[1].view,
        CellView::Badge {
            text: "Open".into(),
            variant: "badge-blue".into()
        }
    );

    let toggles = Arc::new(Mutex::new(Vec::new()));
    let sink = toggles.clone();
    let listener: Arc<dyn SubRowListener> = Arc::new(move |key: &str, on: bool| {
        sink.lock().unwrap().push((key.to_string(), on));
    });
    grid = grid.with_sub_row_listener(listener);

    assert_eq!(grid.toggle_sub_row("wagons").await, Some(true));
    assert_eq!(grid.toggle_sub_row("origin").await, None);
    assert_eq!(*toggles.lock().unwrap(), [("wagons".to_string(), true)]);

    let row = grid.render_row(0).unwrap();
    assert_eq!(row.cells.len(), 4);
    assert_eq!(row.sub_row.len(), 1);
    assert_eq!(row.sub_row[0].view.text(), "W1a +1");
}

#[derive(Default)]
struct RecordingHandler {
    updates: Mutex<Vec<CellUpdate>>,
}

#[async_trait]
impl CellUpdateHandler for RecordingHandler {
    async fn on_cell_update(&self, update: CellUpdate) -> Result<(), UpdateError> {
        self.updates.lock().unwrap().push(update);
        Ok(())
    }
}

#[tokio::test]
async fn test_edit_commit_reaches_handler_without_mutating_rows() {
    let handler = Arc::new(RecordingHandler::default());
    let mut grid = local_grid(GridConfig::new("g")).await.with_update_handler(handler.clone());

    assert!(matches!(
        grid.begin_edit(0, "origin"),
        Err(EditError::NotEditable { .. })
    ));
    assert!(matches!(
        grid.begin_edit(99, "weight"),
        Err(EditError::RowOutOfRange { index: 99 })
    ));

    grid.begin_edit(1, "weight").unwrap();
    grid.edit_input("heavy").unwrap();
    assert!(matches!(
        grid.handle_edit_key(EditKey::Enter).await,
        Some(EditOutcome::Rejected(EditError::InvalidNumber { .. }))
    ));
    assert!(grid.editing().is_some());
    assert_eq!(
        grid.render_row(1).unwrap().cells[3].view.text(),
        "heavy"
    );

    grid.edit_input("250").unwrap();
    let update = grid.commit_edit().await.unwrap();
    assert_eq!(update.field, "weight");
    assert_eq!(update.row.get("id").display_text(), "2");
    assert!(grid.editing().is_none());

    assert_eq!(handler.updates.lock().unwrap().len(), 1);
    assert_eq!(grid.row(1).unwrap().get("weight").display_text(), "200");

    assert!(matches!(grid.commit_edit().await, Err(EditError::NoSession)));
    assert_eq!(grid.handle_edit_key(EditKey::Escape).await, None);
}

#[tokio::test]
async fn test_click_forwards_to_capability() {
    let clicked = Arc::new(Mutex::new(None));
    let sink = clicked.clone();
    let columns = ColumnSet::new(vec![ColumnDef::new("trip", "Trip")
        .with_type(ColumnType::Link)
        .on_click(move |row: &Row, _key: &str| {
            *sink.lock().unwrap() = Some(row.get("trip").display_text());
        })])
    .unwrap();
    let source = RowSource::Local(vec![Row::new().set("trip", "T-5")]);
    let mut grid = SmartGrid::new(GridConfig::new("g"), columns, source, Arc::new(NoPersistence));
    grid.mount().await;

    assert!(grid.click(0, "trip"));
    assert!(!grid.click(3, "trip"));
    assert_eq!(clicked.lock().unwrap().as_deref(), Some("T-5"));
}

#[tokio::test]
async fn test_layout_uses_width_preferences() {
    let mut grid = local_grid(GridConfig::new("g")).await;
    grid.update_column_width("origin", 222).await;
    grid.toggle_column_visibility("status").await;

    let widths = grid.layout(1400);
    assert_eq!(widths.len(), 4);
    assert_eq!(widths.iter().find(|w| w.key == "origin").unwrap().width, 222);
    assert!(widths.iter().map(|w| w.width).sum::<u32>() <= 1400);
}

#[tokio::test]
async fn test_preferences_survive_remount() {
    let backend: Arc<dyn PreferencesBackend> = Arc::new(MemoryBackend::new());
    let make = |backend: &Arc<dyn PreferencesBackend>| {
        SmartGrid::new(
            GridConfig::new("dispatch"),
            columns(),
            RowSource::Local(rows()),
            Arc::new(LocalPreferences::new(backend.clone(), "dispatch")),
        )
    };

    let mut first = make(&backend);
    first.mount().await;
    first.toggle_sort("origin").await;
    first.set_filter(FilterPredicate::equals("origin", "Basel")).await;
    first.update_column_header("origin", "From").await;

    let mut second = make(&backend);
    second.mount().await;
    assert_eq!(ids(&second.visible_rows()), ["1", "2", "3"]);
    let header = second.headers().into_iter().find(|h| h.key == "origin").unwrap();
    assert_eq!(header.label, "From");
    assert!(header.filtered);
}

#[tokio::test]
async fn test_export_uses_view_and_custom_headers() {
    let mut grid = local_grid(GridConfig::new("g").with_export_file_stem("open-trips")).await;
    grid.set_filter(FilterPredicate::equals("status", "Closed")).await;
    grid.update_column_header("weight", "Tonnes").await;
    grid.toggle_column_visibility("wagons").await;

    let csv = String::from_utf8(grid.export_bytes(ExportFormat::Csv).unwrap()).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Id,Status,Origin,Tonnes"));
    assert_eq!(lines.count(), 3);

    let dir = tempfile::tempdir().unwrap();
    let path = grid.export(ExportFormat::Xlsx, dir.path()).unwrap();
    assert_eq!(path.file_name().unwrap(), "open-trips.xlsx");
}

struct PagedFetcher {
    rows: Vec<Row>,
    requests: Mutex<Vec<FetchRequest>>,
}

#[async_trait]
impl RowFetcher for PagedFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchedPage, FetchError> {
        self.requests.lock().unwrap().push(request.clone());
        let needle = request.search.to_lowercase();
        let matching: Vec<Row> = self
            .rows
            .iter()
            .filter(|r| needle.is_empty() || r.get("origin").display_text().to_lowercase().contains(&needle))
            .cloned()
            .collect();
        let page = matching
            .iter()
            .skip(request.page * request.page_size)
            .take(request.page_size)
            .cloned()
            .collect();
        Ok(FetchedPage::new(page, matching.len()))
    }
}

#[tokio::test]
async fn test_remote_source_pages_and_forwards_query() {
    let fetcher = Arc::new(PagedFetcher {
        rows: rows(),
        requests: Mutex::new(Vec::new()),
    });
    let columns = ColumnSet::new(vec![
        ColumnDef::new("id", "Id").sortable(),
        ColumnDef::new("origin", "Origin").with_filter_mode(FilterMode::Server),
    ])
    .unwrap();
    let config = GridConfig::new("remote")
        .with_page_size(2)
        .with_server_side_search(true);
    let mut grid = SmartGrid::new(config, columns, RowSource::Remote(fetcher.clone()), Arc::new(NoPersistence));
    grid.mount().await;

    assert_eq!(grid.total_count(), 7);
    assert_eq!(grid.page_count(), 4);
    assert_eq!(ids(&grid.page_rows()), ["1", "2"]);

    grid.set_page(3).await;
    assert_eq!(ids(&grid.page_rows()), ["7"]);

    grid.set_search("basel").await;
    assert_eq!(grid.page(), 0);
    assert_eq!(grid.total_count(), 3);

    grid.set_filter(FilterPredicate::equals("origin", "ignored-locally")).await;
    assert_eq!(grid.page_rows().len(), 2);

    let requests = fetcher.requests.lock().unwrap();
    let last = requests.last().unwrap();
    assert_eq!(last.search, "basel");
    assert_eq!(last.filters, [FilterPredicate::equals("origin", "ignored-locally")]);
}

struct FailingFetcher;

#[async_trait]
impl RowFetcher for FailingFetcher {
    async fn fetch(&self, _request: FetchRequest) -> Result<FetchedPage, FetchError> {
        Err(FetchError::remote(503, "unavailable"))
    }
}

#[tokio::test]
async fn test_fetch_failure_yields_empty_view() {
    let mut grid = SmartGrid::new(
        GridConfig::new("g"),
        columns(),
        RowSource::Remote(Arc::new(FailingFetcher)),
        Arc::new(NoPersistence),
    );
    grid.mount().await;

    assert!(grid.visible_rows().is_empty());
    assert_eq!(grid.total_count(), 0);
    assert!(grid.render_row(0).is_none());
}

#[tokio::test]
async fn test_set_rows_trims_selection() {
    let mut grid = local_grid(GridConfig::new("g").with_selection_mode(SelectionMode::Multi)).await;
    grid.select_all();
    assert_eq!(grid.selected_rows().len(), 7);

    grid.set_rows(rows().into_iter().take(2).collect());
    assert_eq!(grid.selected_rows().len(), 2);
}

#[tokio::test]
async fn test_remote_source_forwards_search_without_server_flag() {
    let fetcher = Arc::new(PagedFetcher {
        rows: rows(),
        requests: Mutex::new(Vec::new()),
    });
    let config = GridConfig::new("remote").with_page_size(10);
    let mut grid = SmartGrid::new(config, columns(), RowSource::Remote(fetcher.clone()), Arc::new(NoPersistence));
    grid.mount().await;
    assert_eq!(grid.total_count(), 7);

    grid.set_search(" zurich ").await;
    assert_eq!(grid.total_count(), 4);
    assert_eq!(ids(&grid.visible_rows()), ["4", "5", "6", "7"]);

    let requests = fetcher.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].search, "zurich");
}

#[tokio::test]
async fn test_read_only_grid_does_not_accumulate_query() {
    let backend: Arc<dyn PreferencesBackend> = Arc::new(MemoryBackend::new());
    let stored: Arc<dyn PreferencesPersistence> = Arc::new(LocalPreferences::new(backend.clone(), "cli"));

    let mut saved = SmartGrid::new(GridConfig::new("cli"), columns(), RowSource::Local(rows()), stored.clone());
    saved.mount().await;
    saved.update_column_header("origin", "From").await;

    for _ in 0..2 {
        let mut run = SmartGrid::new(
            GridConfig::new("cli"),
            columns(),
            RowSource::Local(rows()),
            Arc::new(ReadOnlyPreferences::new(stored.clone())),
        );
        run.mount().await;
        assert_eq!(run.toggle_sort("weight").await, Some(SortSpec::asc("weight")));
        run.set_filter(FilterPredicate::equals("origin", "Basel")).await;
        assert_eq!(ids(&run.visible_rows()), ["1", "2", "3"]);
        assert_eq!(run.preferences().header("origin"), Some("From"));
    }

    let on_disk = stored.load().await.unwrap().unwrap();
    assert!(on_disk.sort.is_none());
    assert!(on_disk.filters.is_empty());
}

#[tokio::test]
async fn test_set_columns_reconciles_live_grid() {
    let mut grid = local_grid(GridConfig::new("g")).await;
    grid.toggle_sort("origin").await;
    grid.toggle_column_visibility("weight").await;

    let narrower = ColumnSet::new(vec![
        ColumnDef::new("id", "Id").mandatory().sortable(),
        ColumnDef::new("weight", "Weight").sortable(),
        ColumnDef::new("note", "Note"),
    ])
    .unwrap();
    grid.set_columns(narrower).await;

    let prefs = grid.preferences();
    assert_eq!(prefs.column_order, ["id", "weight", "note"]);
    assert!(prefs.sort.is_none());
    assert!(prefs.is_hidden("weight"));
    let keys: Vec<String> = grid.headers().into_iter().map(|h| h.key).collect();
    assert_eq!(keys, ["id", "note"]);
}

#[tokio::test]
async fn test_reset_preferences_restores_defaults_and_view() {
    let mut grid = local_grid(GridConfig::new("g").with_selection_mode(SelectionMode::Multi)).await;
    grid.set_filter(FilterPredicate::equals("status", "Open")).await;
    grid.toggle_column_visibility("origin").await;
    grid.update_column_header("id", "Trip").await;
    grid.toggle_select(0);

    grid.reset_preferences().await;

    assert_eq!(grid.preferences().column_order, ["id", "status", "origin", "weight", "wagons"]);
    assert!(grid.preferences().filters.is_empty());
    assert!(grid.preferences().hidden_columns.is_empty());
    assert_eq!(grid.visible_rows().len(), 7);
    assert!(grid.selection().is_empty());
    let header = grid.headers().into_iter().next().unwrap();
    assert_eq!(header.label, "Id");
}
