use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use smartgrid_lib::export::ExportFormat;

/// Headless data grid: search, filter, sort, page and export tabular JSON.
#[derive(Parser, Debug)]
#[command(name = "smartgrid", version, about)]
pub struct Args {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Write logs to the default log file in the platform cache directory.
    #[arg(long, global = true, conflicts_with = "log_file")]
    pub log_to_cache: bool,

    /// Preferences database. Defaults to the platform data directory.
    #[arg(long, global = true)]
    pub prefs_db: Option<PathBuf>,

    /// Keep preferences in memory only.
    #[arg(long, global = true)]
    pub no_persist: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print one page of the grid.
    View {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        query: QueryArgs,

        /// Zero-based page to print.
        #[arg(long, default_value_t = 0)]
        page: usize,

        /// Container width in pixels used for column layout.
        #[arg(long, default_value_t = 1200)]
        width: u32,
    },

    /// Export the filtered and sorted rows.
    Export {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        query: QueryArgs,

        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,

        /// Output directory.
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// Show or reset stored preferences for a grid description.
    Prefs {
        #[command(flatten)]
        input: InputArgs,

        /// Discard stored preferences.
        #[arg(long)]
        reset: bool,
    },
}

#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// Grid description: `{"config": {...}, "columns": [...]}`.
    #[arg(long)]
    pub grid: PathBuf,

    /// Rows as a JSON array of objects.
    #[arg(long)]
    pub rows: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct QueryArgs {
    /// Global search text.
    #[arg(long)]
    pub search: Option<String>,

    /// Column to sort by; repeat the flag to flip direction.
    #[arg(long)]
    pub sort: Vec<String>,

    /// Column filter as `column:operator:value`, e.g. `status:equals:Open`.
    #[arg(long)]
    pub filter: Vec<String>,

    /// Store the resulting sort and filters as the grid's preferences.
    /// Without it the query only applies to this run.
    #[arg(long)]
    pub save: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Format {
    Csv,
    Xlsx,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => ExportFormat::Csv,
            Format::Xlsx => ExportFormat::Xlsx,
        }
    }
}
