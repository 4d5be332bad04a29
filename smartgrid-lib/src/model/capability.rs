//! Per-column behaviour capabilities.
//!
//! Column definitions carry behaviour as small traits instead of loose
//! callbacks. The renderer and editor check for a capability before using it,
//! and tests can hand in mock implementations.

use std::sync::Arc;

use super::CellValue;
use super::Row;

/// A column whose cells react to clicks (link columns).
pub trait Clickable: Send + Sync {
    /// Called when a cell in `column_key` is clicked for `row`.
    fn on_click(&self, row: &Row, column_key: &str);
}

/// A column that validates edited values before they are committed.
pub trait CellValidator: Send + Sync {
    /// Returns `Err(message)` to reject the value.
    fn validate(&self, value: &CellValue, row: &Row) -> Result<(), String>;
}

impl<F> Clickable for F
where
    F: Fn(&Row, &str) + Send + Sync,
{
    fn on_click(&self, row: &Row, column_key: &str) {
        self(row, column_key)
    }
}

impl<F> CellValidator for F
where
    F: Fn(&CellValue, &Row) -> Result<(), String> + Send + Sync,
{
    fn validate(&self, value: &CellValue, row: &Row) -> Result<(), String> {
        self(value, row)
    }
}

/// Shared handle to a click capability.
pub type ClickHandler = Arc<dyn Clickable>;

/// Shared handle to a validation capability.
pub type ValidatorHandle = Arc<dyn CellValidator>;

/// Rejects blank values. Attached automatically to mandatory editable columns
/// by [`ColumnDef::required`](super::ColumnDef::required).
#[derive(Debug, Clone)]
pub struct RequiredValidator {
    message: String,
}

impl RequiredValidator {
    /// Creates a validator with the given rejection message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl CellValidator for RequiredValidator {
    fn validate(&self, value: &CellValue, _row: &Row) -> Result<(), String> {
        if value.is_empty() {
            Err(self.message.clone())
        } else {
            Ok(())
        }
    }
}
