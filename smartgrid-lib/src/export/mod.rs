//! CSV and spreadsheet export of the current view.

mod csv;
mod xlsx;

pub use csv::*;
pub use xlsx::*;

use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ExportError;
use crate::model::ColumnDef;
use crate::model::Row;

/// Sheet name used when none is configured.
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Export file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            other => Err(format!("unknown export format '{other}'")),
        }
    }
}

/// Exports a fixed set of columns and rows.
///
/// # Example
///
/// ```
/// use smartgrid_lib::export::{ExportFormat, Exporter};
/// use smartgrid_lib::model::{ColumnDef, Row};
///
/// let columns = [ColumnDef::new("trip", "Trip")];
/// let refs: Vec<&ColumnDef> = columns.iter().collect();
/// let rows = [Row::new().set("trip", "T-1")];
///
/// let bytes = Exporter::new(refs, &rows).bytes(ExportFormat::Csv).unwrap();
/// assert_eq!(String::from_utf8(bytes).unwrap(), "Trip\nT-1\n");
/// ```
#[derive(Debug, Clone)]
pub struct Exporter<'a> {
    columns: Vec<&'a ColumnDef>,
    rows: &'a [Row],
    sheet_name: String,
}

impl<'a> Exporter<'a> {
    pub fn new(columns: Vec<&'a ColumnDef>, rows: &'a [Row]) -> Self {
        Self {
            columns,
            rows,
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }

    /// Sets the worksheet name used for spreadsheet exports.
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Renders the export in memory.
    pub fn bytes(&self, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        match format {
            ExportFormat::Csv => Ok(to_csv(&self.columns, self.rows).into_bytes()),
            ExportFormat::Xlsx => to_xlsx(&self.columns, self.rows, &self.sheet_name),
        }
    }

    /// Writes the export to `path`, adding the format's extension when the
    /// path has none. Returns the path written.
    pub fn write(&self, format: ExportFormat, path: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        let mut path = path.as_ref().to_path_buf();
        if path.extension().is_none() {
            path.set_extension(format.extension());
        }
        let bytes = self.bytes(format)?;
        std::fs::write(&path, bytes)?;
        log::info!("exported {} rows to {}", self.rows.len(), path.display());
        Ok(path)
    }
}
