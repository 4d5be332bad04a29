//! Inline cell editing.
//!
//! An [`EditSession`] holds the text the user is typing for one cell. Commit
//! coerces the text to the column's type and runs the column's validator.
//! A rejection keeps the session open with the error attached; nothing is
//! written until the host applies the resulting [`CellUpdate`].

use async_trait::async_trait;

use crate::error::EditError;
use crate::error::UpdateError;
use crate::model::parse_number;
use crate::model::CellValue;
use crate::model::ColumnDef;
use crate::model::ColumnType;
use crate::model::Row;
use crate::model::StyledValue;

/// Keys an edit session reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    /// Commit the edit.
    Enter,
    /// Discard the edit.
    Escape,
}

/// Result of feeding a key to an [`EditSession`].
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// The edit committed.
    Committed(CellUpdate),
    /// The commit was rejected; the session stays open.
    Rejected(EditError),
    /// The edit was discarded.
    Cancelled,
}

/// A committed cell change, handed to the host's [`CellUpdateHandler`].
#[derive(Debug, Clone, PartialEq)]
pub struct CellUpdate {
    /// Index of the row in the view the edit started from.
    pub row_index: usize,
    /// Column key.
    pub field: String,
    /// Coerced new value.
    pub value: CellValue,
    /// Copy of the row carrying the new value.
    pub row: Row,
}

/// Receives committed cell updates.
///
/// The grid never mutates its own rows; the handler is expected to persist
/// the change and feed updated rows back.
#[async_trait]
pub trait CellUpdateHandler: Send + Sync {
    async fn on_cell_update(&self, update: CellUpdate) -> Result<(), UpdateError>;
}

/// Notified when a column moves into or out of the sub-row.
pub trait SubRowListener: Send + Sync {
    fn on_sub_row_toggle(&self, column_key: &str, in_sub_row: bool);
}

impl<F> SubRowListener for F
where
    F: Fn(&str, bool) + Send + Sync,
{
    fn on_sub_row_toggle(&self, column_key: &str, in_sub_row: bool) {
        self(column_key, in_sub_row)
    }
}

/// In-progress edit of one cell.
#[derive(Debug, Clone)]
pub struct EditSession {
    row_index: usize,
    column: ColumnDef,
    row: Row,
    input: String,
    error: Option<EditError>,
}

impl EditSession {
    /// Starts editing `column` of `row`, seeded with the current cell text.
    ///
    /// Fails with [`EditError::NotEditable`] unless the column is editable or
    /// of an inline editor type.
    pub fn begin(row_index: usize, column: &ColumnDef, row: &Row) -> Result<Self, EditError> {
        if !column.editable && !column.column_type.is_inline_editor() {
            return Err(EditError::NotEditable {
                field: column.key.clone(),
            });
        }
        Ok(Self {
            row_index,
            column: column.clone(),
            row: row.clone(),
            input: row.get(&column.key).display_text(),
            error: None,
        })
    }

    /// Row index the session was started for.
    pub fn row_index(&self) -> usize {
        self.row_index
    }

    /// Key of the column being edited.
    pub fn field(&self) -> &str {
        &self.column.key
    }

    /// Current input text.
    pub fn text(&self) -> &str {
        &self.input
    }

    /// Error from the last rejected commit, if the input has not changed since.
    pub fn error(&self) -> Option<&EditError> {
        self.error.as_ref()
    }

    /// Replaces the input text and clears any pending error.
    pub fn input(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.input {
            self.error = None;
        }
        self.input = text;
    }

    /// Coerces and validates the input.
    ///
    /// While an earlier rejection is pending for the same input, commit keeps
    /// failing with that error without re-running the validator.
    pub fn commit(&mut self) -> Result<CellUpdate, EditError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        match self.validated() {
            Ok(update) => Ok(update),
            Err(err) => {
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Discards the session.
    pub fn cancel(self) {
        log::trace!("edit of '{}' cancelled", self.column.key);
    }

    /// Routes a key press: Enter commits, Escape cancels.
    pub fn handle_key(&mut self, key: EditKey) -> EditOutcome {
        match key {
            EditKey::Enter => match self.commit() {
                Ok(update) => EditOutcome::Committed(update),
                Err(err) => EditOutcome::Rejected(err),
            },
            EditKey::Escape => EditOutcome::Cancelled,
        }
    }

    fn validated(&self) -> Result<CellUpdate, EditError> {
        let key = &self.column.key;
        let mut value = coerce(&self.column, &self.input)?;

        // Badge-like values keep their style tag through an edit.
        if let CellValue::Styled(original) = self.row.get(key) {
            if !value.is_null() {
                let variant = self
                    .column
                    .status_variant(&value.display_text())
                    .map(str::to_string)
                    .or_else(|| original.variant.clone());
                value = CellValue::Styled(StyledValue {
                    value: Box::new(value),
                    variant,
                });
            }
        }

        if let Some(validator) = self.column.validator_handle() {
            validator
                .validate(&value, &self.row)
                .map_err(|message| EditError::rejected(key.clone(), message))?;
        }

        let mut row = self.row.clone();
        row.insert(key.clone(), value.clone());
        Ok(CellUpdate {
            row_index: self.row_index,
            field: key.clone(),
            value,
            row,
        })
    }
}

/// Converts raw input text to a value of the column's type.
///
/// Numbers parse or fail, dates pass through, blank numeric or date input is
/// `Null`. Dropdowns only accept one of their option values.
pub fn coerce(column: &ColumnDef, input: &str) -> Result<CellValue, EditError> {
    let trimmed = input.trim();
    match column.column_type {
        t if t.is_numeric() => {
            if trimmed.is_empty() {
                return Ok(CellValue::Null);
            }
            parse_number(trimmed)
                .map(CellValue::Number)
                .ok_or_else(|| EditError::InvalidNumber {
                    input: input.to_string(),
                })
        }
        t if t.is_date() => {
            if trimmed.is_empty() {
                Ok(CellValue::Null)
            } else {
                Ok(CellValue::Text(trimmed.to_string()))
            }
        }
        ColumnType::Dropdown if !column.options.is_empty() && !trimmed.is_empty() => {
            if column.options.iter().any(|o| o.value == trimmed) {
                Ok(CellValue::Text(trimmed.to_string()))
            } else {
                Err(EditError::rejected(
                    column.key.clone(),
                    format!("'{trimmed}' is not one of the allowed options"),
                ))
            }
        }
        _ => Ok(CellValue::Text(input.to_string())),
    }
}
