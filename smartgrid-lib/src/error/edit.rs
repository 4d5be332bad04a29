//! Inline cell edit errors

/// Errors that block an inline edit from committing.
///
/// These are shown next to the cell being edited; they never affect other
/// rows or cells.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// The input could not be parsed as a number for a numeric column.
    #[error("'{input}' is not a valid number")]
    InvalidNumber { input: String },

    /// The column's validator rejected the value.
    #[error("{message}")]
    Rejected { field: String, message: String },

    /// The column does not accept inline edits.
    #[error("Column '{field}' is not editable")]
    NotEditable { field: String },

    /// The row index does not exist in the current view.
    #[error("Row {index} is out of range")]
    RowOutOfRange { index: usize },

    /// A commit was requested but no edit is in progress.
    #[error("No edit in progress")]
    NoSession,
}

impl EditError {
    /// Creates a new validator rejection.
    pub fn rejected(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error returned by a caller's cell update handler.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Cell update failed: {message}")]
pub struct UpdateError {
    /// Human-readable description supplied by the handler.
    pub message: String,
}

impl UpdateError {
    /// Creates a new update error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
