//! Column manager: which columns show where, under which header.
//!
//! Pure functions over a [`ColumnSet`] and the grid's [`GridPreferences`].
//! The drag-reorder and visibility mutations themselves live on
//! [`PreferencesStore`](crate::preferences::PreferencesStore).

use crate::model::ColumnDef;
use crate::model::ColumnSet;
use crate::preferences::GridPreferences;

/// One line of the column manager list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnEntry {
    /// Column key.
    pub key: String,
    /// Header shown for the column (custom header or label).
    pub header: String,
    /// The column is shown (main row or sub-row).
    pub visible: bool,
    /// The visibility toggle is disabled.
    pub mandatory: bool,
    /// The column may be moved into the sub-row.
    pub sub_row_eligible: bool,
    /// The column currently renders in the sub-row.
    pub in_sub_row: bool,
}

/// Returns the header for a column: the user's custom header if set,
/// otherwise the column label.
pub fn header_label<'a>(column: &'a ColumnDef, prefs: &'a GridPreferences) -> &'a str {
    prefs.header(&column.key).unwrap_or(&column.label)
}

/// Returns `true` if the user may hide the column.
pub fn can_hide(column: &ColumnDef) -> bool {
    !column.mandatory
}

/// Columns of the main row, in display order.
///
/// Hidden columns and columns moved into the sub-row are left out.
pub fn visible_columns<'a>(columns: &'a ColumnSet, prefs: &GridPreferences) -> Vec<&'a ColumnDef> {
    prefs
        .column_order
        .iter()
        .filter_map(|key| columns.get(key))
        .filter(|c| !prefs.is_hidden(&c.key) && !prefs.is_sub_row(&c.key))
        .collect()
}

/// Columns of the expandable sub-row, in sub-row order. Hidden columns are
/// left out.
pub fn sub_row_columns<'a>(columns: &'a ColumnSet, prefs: &GridPreferences) -> Vec<&'a ColumnDef> {
    prefs
        .sub_row_column_order
        .iter()
        .filter(|key| prefs.is_sub_row(key) && !prefs.is_hidden(key))
        .filter_map(|key| columns.get(key))
        .collect()
}

/// Every column with its manager state, in display order.
pub fn manager_entries(columns: &ColumnSet, prefs: &GridPreferences) -> Vec<ColumnEntry> {
    prefs
        .column_order
        .iter()
        .filter_map(|key| columns.get(key))
        .map(|c| ColumnEntry {
            key: c.key.clone(),
            header: header_label(c, prefs).to_string(),
            visible: !prefs.is_hidden(&c.key),
            mandatory: !can_hide(c),
            sub_row_eligible: c.sub_row,
            in_sub_row: prefs.is_sub_row(&c.key),
        })
        .collect()
}

/// Filters the column manager list by a case-insensitive match on header,
/// label or key. A blank query keeps every entry.
pub fn search_columns(entries: &[ColumnEntry], columns: &ColumnSet, query: &str) -> Vec<ColumnEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return entries.to_vec();
    }
    entries
        .iter()
        .filter(|entry| {
            let label = columns.get(&entry.key).map(|c| c.label.as_str()).unwrap_or("");
            [entry.header.as_str(), label, entry.key.as_str()]
                .iter()
                .any(|s| s.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}
