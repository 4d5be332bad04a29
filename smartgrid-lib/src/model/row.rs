//! Dynamic grid row

use std::collections::HashMap;

use super::CellValue;

/// A row of grid data.
///
/// Rows are plain key/value records. The grid only ever reads
/// `row.get(column.key)`; it has no opinion on what else a row carries.
///
/// # Example
///
/// ```
/// use smartgrid_lib::model::{CellValue, Row};
///
/// let row = Row::new()
///     .set("trip", "T-100")
///     .set("wagons", 12);
///
/// assert_eq!(row.get("trip").display_text(), "T-100");
/// assert!(row.get("missing").is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    pub(crate) fields: HashMap<String, CellValue>,
}

static NULL: CellValue = CellValue::Null;

impl Row {
    /// Creates a new empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cell for a field, or [`CellValue::Null`] when absent.
    pub fn get(&self, field: &str) -> &CellValue {
        self.fields.get(field).unwrap_or(&NULL)
    }

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_reads_as_null() {
        let row: Row = [("name", "Basel")].into_iter().collect();

        assert_eq!(row.get("name").display_text(), "Basel");
        assert!(row.get("absent").is_null());
    }
}
