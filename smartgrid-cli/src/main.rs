mod cli;
mod error;
mod input;

use std::fs::File;
use std::sync::Arc;

use clap::Parser;
use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;
use smartgrid_lib::SmartGrid;
use smartgrid_lib::layout::AllocatedWidth;
use smartgrid_lib::paths;
use smartgrid_lib::pipeline::SortDirection;
use smartgrid_lib::preferences::LocalPreferences;
use smartgrid_lib::preferences::MemoryBackend;
use smartgrid_lib::preferences::PreferencesBackend;
use smartgrid_lib::preferences::PreferencesPersistence;
use smartgrid_lib::preferences::ReadOnlyPreferences;
use smartgrid_lib::preferences::SqliteBackend;
use smartgrid_lib::source::RowSource;

use crate::cli::Args;
use crate::cli::Command;
use crate::cli::InputArgs;
use crate::cli::QueryArgs;
use crate::error::CliError;

/// Approximate pixels per terminal column when printing a layout.
const PX_PER_CHAR: u32 = 8;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = init_logger(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(args).await {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logger(args: &Args) -> Result<(), CliError> {
    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let log_file = match &args.log_file {
        Some(path) => Some(path.clone()),
        None if args.log_to_cache => paths::log_file(),
        None => None,
    };
    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|source| CliError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            let file = File::create(&path).map_err(|source| CliError::Io { path, source })?;
            WriteLogger::init(level, Config::default(), file)
        }
        None => TermLogger::init(
            level,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
    }
    .map_err(|e| CliError::Logger(e.to_string()))
}

async fn run(args: Args) -> Result<(), CliError> {
    let backend = open_backend(&args).await?;

    match args.command {
        Command::View {
            input,
            query,
            page,
            width,
        } => {
            let mut grid = build_grid(&input, backend, query.save).await?;
            apply_query(&mut grid, &query).await?;
            grid.set_page(page).await;
            print_page(&grid, width);
        }
        Command::Export {
            input,
            query,
            format,
            out,
        } => {
            let mut grid = build_grid(&input, backend, query.save).await?;
            apply_query(&mut grid, &query).await?;
            let path = grid.export(format.into(), &out)?;
            println!("{}", path.display());
        }
        Command::Prefs { input, reset } => {
            let mut grid = build_grid(&input, backend, true).await?;
            if reset {
                grid.reset_preferences().await;
            }
            let json =
                serde_json::to_string_pretty(grid.preferences()).map_err(CliError::Encode)?;
            println!("{}", json);
        }
    }
    Ok(())
}

async fn open_backend(args: &Args) -> Result<Arc<dyn PreferencesBackend>, CliError> {
    if args.no_persist {
        return Ok(Arc::new(MemoryBackend::new()));
    }
    let backend = match &args.prefs_db {
        Some(path) => SqliteBackend::open(path).await?,
        None => SqliteBackend::open_default().await?,
    };
    log::debug!(
        "using preferences database {}",
        args.prefs_db
            .clone()
            .or_else(paths::preferences_db)
            .unwrap_or_default()
            .display()
    );
    Ok(Arc::new(backend))
}

async fn build_grid(
    input: &InputArgs,
    backend: Arc<dyn PreferencesBackend>,
    save: bool,
) -> Result<SmartGrid, CliError> {
    let description = input::load_grid(&input.grid)?;
    let rows = input::load_rows(input.rows.as_deref())?;
    let mut persistence: Arc<dyn PreferencesPersistence> = Arc::new(LocalPreferences::new(
        backend,
        &description.config.preferences_key,
    ));
    if !save {
        persistence = Arc::new(ReadOnlyPreferences::new(persistence));
    }

    let mut grid = SmartGrid::new(
        description.config,
        description.columns,
        RowSource::Local(rows),
        persistence,
    );
    grid.mount().await;
    Ok(grid)
}

async fn apply_query(grid: &mut SmartGrid, query: &QueryArgs) -> Result<(), CliError> {
    for raw in &query.filter {
        grid.set_filter(input::parse_filter(raw)?).await;
    }
    for column in &query.sort {
        if grid.toggle_sort(column).await.is_none() {
            log::warn!("column '{}' is not sortable", column);
        }
    }
    if let Some(search) = &query.search {
        grid.set_search(search.as_str()).await;
    }
    Ok(())
}

fn print_page(grid: &SmartGrid, container_width: u32) {
    let widths = grid.layout(container_width);
    let headers: Vec<String> = grid
        .headers()
        .into_iter()
        .map(|h| {
            let marker = match h.sort {
                Some(SortDirection::Asc) => " ^",
                Some(SortDirection::Desc) => " v",
                None => "",
            };
            format!("{}{}", h.label, marker)
        })
        .collect();
    println!("{}", format_line(&headers, &widths));

    for row in grid.render_page() {
        let cells: Vec<String> = row.cells.iter().map(|c| c.view.text()).collect();
        println!("{}", format_line(&cells, &widths));
        for cell in row.sub_row.iter().filter(|c| !c.view.text().is_empty()) {
            println!("    {}: {}", cell.key, cell.view.text());
        }
    }

    println!(
        "page {}/{} ({} rows)",
        grid.page() + 1,
        grid.page_count().max(1),
        grid.total_count()
    );
}

fn format_line(cells: &[String], widths: &[AllocatedWidth]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(text, w)| fit(text, (w.width / PX_PER_CHAR).max(3) as usize))
        .collect::<Vec<_>>()
        .join(" ")
}

fn fit(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len > width {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}~")
    } else {
        format!("{text:width$}")
    }
}
