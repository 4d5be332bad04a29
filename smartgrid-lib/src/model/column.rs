//! Column definitions and the per-grid column registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use super::capability::CellValidator;
use super::capability::ClickHandler;
use super::capability::Clickable;
use super::capability::RequiredValidator;
use super::capability::ValidatorHandle;
use crate::error::ColumnError;

/// How a column's cells are presented and edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColumnType {
    /// Plain text.
    #[default]
    Text,
    /// Right-aligned number.
    Number,
    /// Colored status pill.
    Badge,
    /// Clickable text.
    Link,
    /// Single date/time.
    DateTime,
    /// Start and end date stacked in one cell.
    DateTimeRange,
    /// First item plus a "+N" popover for the rest.
    ExpandableCount,
    /// Single-select from the column's options.
    Dropdown,
    /// Inline text box.
    EditableText,
    /// Inline numeric input.
    EditableNumber,
    /// Inline date input.
    EditableDate,
}

impl ColumnType {
    /// Returns `true` if values of this type are edited as numbers.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Number | ColumnType::EditableNumber)
    }

    /// Returns `true` if values of this type are dates.
    pub fn is_date(self) -> bool {
        matches!(
            self,
            ColumnType::DateTime | ColumnType::DateTimeRange | ColumnType::EditableDate
        )
    }

    /// Returns `true` if this type renders as an inline input.
    pub fn is_inline_editor(self) -> bool {
        matches!(
            self,
            ColumnType::EditableText | ColumnType::EditableNumber | ColumnType::EditableDate
        )
    }
}

/// Where a column filter is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterMode {
    /// Evaluated by the local data pipeline.
    #[default]
    Client,
    /// Delegated to the remote data source; skipped locally.
    Server,
}

/// One entry of a dropdown column's choice list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnOption {
    /// Text shown to the user.
    pub label: String,
    /// Value stored in the row.
    pub value: String,
}

impl ColumnOption {
    /// Creates a new option.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A grid column definition.
///
/// # Example
///
/// ```
/// use smartgrid_lib::model::{ColumnDef, ColumnType};
///
/// let status = ColumnDef::new("status", "Status")
///     .with_type(ColumnType::Badge)
///     .status("Open", "badge-blue")
///     .status("Closed", "badge-red")
///     .sortable()
///     .filterable();
///
/// assert!(status.sortable);
/// assert_eq!(status.status_variant("Closed"), Some("badge-red"));
/// ```
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnDef {
    /// Row field this column reads. Unique within a grid.
    pub key: String,
    /// Header text, unless the user renamed the column.
    pub label: String,
    /// Presentation and editing type.
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Header click sorts by this column.
    pub sortable: bool,
    /// A filter input is offered for this column.
    pub filterable: bool,
    /// Cells can be edited inline.
    pub editable: bool,
    /// The column can never be hidden.
    pub mandatory: bool,
    /// The column may be moved into the expandable sub-row.
    pub sub_row: bool,
    /// Where filters on this column are evaluated.
    pub filter_mode: FilterMode,
    /// Choice list for dropdown columns.
    pub options: Vec<ColumnOption>,
    /// Value to style tag mapping for badge columns.
    pub status_map: HashMap<String, String>,
    /// Configured width in pixels.
    pub width: Option<u32>,
    /// Lower width bound in pixels.
    pub min_width: Option<u32>,
    /// Upper width bound in pixels.
    pub max_width: Option<u32>,
    #[serde(skip)]
    click: Option<ClickHandler>,
    #[serde(skip)]
    validator: Option<ValidatorHandle>,
}

impl ColumnDef {
    /// Creates a text column with the given key and label.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            ..Self::default()
        }
    }

    /// Sets the column type.
    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }

    /// Marks the column as sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Marks the column as filterable.
    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    /// Marks the column as editable.
    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    /// Marks the column as mandatory (cannot be hidden).
    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    /// Allows the column to be moved into the sub-row.
    pub fn sub_row(mut self) -> Self {
        self.sub_row = true;
        self
    }

    /// Sets where filters on this column are evaluated.
    pub fn with_filter_mode(mut self, mode: FilterMode) -> Self {
        self.filter_mode = mode;
        self
    }

    /// Adds a dropdown option.
    pub fn option(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push(ColumnOption::new(label, value));
        self
    }

    /// Maps a badge value to a style tag.
    pub fn status(mut self, value: impl Into<String>, variant: impl Into<String>) -> Self {
        self.status_map.insert(value.into(), variant.into());
        self
    }

    /// Sets the configured width.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Sets lower and upper width bounds.
    pub fn with_bounds(mut self, min: u32, max: u32) -> Self {
        self.min_width = Some(min);
        self.max_width = Some(max.max(min));
        self
    }

    /// Attaches a click capability.
    pub fn on_click(mut self, handler: impl Clickable + 'static) -> Self {
        self.click = Some(Arc::new(handler));
        self
    }

    /// Attaches a validation capability.
    pub fn validator(mut self, validator: impl CellValidator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Marks the column mandatory and rejects blank edits with `message`.
    pub fn required(self, message: impl Into<String>) -> Self {
        self.mandatory().validator(RequiredValidator::new(message))
    }

    /// Returns the click capability, if any.
    pub fn click_handler(&self) -> Option<&ClickHandler> {
        self.click.as_ref()
    }

    /// Returns the validation capability, if any.
    pub fn validator_handle(&self) -> Option<&ValidatorHandle> {
        self.validator.as_ref()
    }

    /// Returns the style tag mapped to a badge value.
    pub fn status_variant(&self, value: &str) -> Option<&str> {
        self.status_map.get(value).map(String::as_str)
    }

    /// Returns `true` if filters on this column run locally.
    pub fn filters_locally(&self) -> bool {
        self.filter_mode == FilterMode::Client
    }
}

impl fmt::Debug for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("column_type", &self.column_type)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("editable", &self.editable)
            .field("mandatory", &self.mandatory)
            .field("sub_row", &self.sub_row)
            .field("filter_mode", &self.filter_mode)
            .field("width", &self.width)
            .field("clickable", &self.click.is_some())
            .field("validated", &self.validator.is_some())
            .finish()
    }
}

// =============================================================================
// ColumnSet
// =============================================================================

/// The ordered column registry of one grid instance.
///
/// Construction enforces key uniqueness; lookups are by key.
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
    columns: Vec<ColumnDef>,
    index: HashMap<String, usize>,
}

impl ColumnSet {
    /// Builds a column set, rejecting empty or duplicate keys.
    pub fn new(columns: Vec<ColumnDef>) -> Result<Self, ColumnError> {
        let mut index = HashMap::with_capacity(columns.len());
        for (position, column) in columns.iter().enumerate() {
            if column.key.is_empty() {
                return Err(ColumnError::EmptyKey { position });
            }
            if index.insert(column.key.clone(), position).is_some() {
                return Err(ColumnError::duplicate(&column.key));
            }
        }
        Ok(Self { columns, index })
    }

    /// Returns the column with the given key.
    pub fn get(&self, key: &str) -> Option<&ColumnDef> {
        self.index.get(key).map(|&i| &self.columns[i])
    }

    /// Returns `true` if the set defines `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the columns in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter()
    }

    /// Returns all keys in declaration order.
    pub fn keys(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.key.clone()).collect()
    }

    /// Returns the columns as a slice.
    pub fn as_slice(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
