//! Export error types

/// Errors that can occur while exporting the current view.
///
/// CSV generation is pure string building and has no failure mode of its own;
/// only writing the result to disk can fail. Spreadsheet generation wraps the
/// writer's error in a readable message.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The spreadsheet writer failed.
    #[error("Failed to generate spreadsheet: {message}")]
    Spreadsheet { message: String },

    /// Writing the exported file failed.
    #[error("Failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Creates a new spreadsheet error.
    pub fn spreadsheet(message: impl Into<String>) -> Self {
        Self::Spreadsheet {
            message: message.into(),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::spreadsheet(err.to_string())
    }
}
