//! Grid preference state and its reconciliation with the current columns.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::model::ColumnSet;
use crate::pipeline::FilterPredicate;
use crate::pipeline::SortSpec;

/// Per-grid user customization.
///
/// Every collection is keyed by column key. A value produced by
/// [`GridPreferences::defaults`] or [`GridPreferences::merged`] only refers to
/// columns that exist, lists each column exactly once in `column_order`, and
/// never hides a mandatory column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridPreferences {
    /// Display sequence of all columns.
    pub column_order: Vec<String>,
    /// Columns currently hidden.
    pub hidden_columns: BTreeSet<String>,
    /// Pixel width overrides.
    pub column_widths: BTreeMap<String, u32>,
    /// Custom header labels.
    pub column_headers: BTreeMap<String, String>,
    /// Columns rendered in the expandable sub-row.
    pub sub_row_columns: BTreeSet<String>,
    /// Order of the sub-row columns.
    pub sub_row_column_order: Vec<String>,
    /// Active column filters.
    pub filters: Vec<FilterPredicate>,
    /// Active sort.
    pub sort: Option<SortSpec>,
    /// Rows per page, if the user changed it.
    pub page_size: Option<usize>,
}

impl GridPreferences {
    /// Preferences for a fresh grid: declaration order, nothing hidden.
    pub fn defaults(columns: &ColumnSet) -> Self {
        Self {
            column_order: columns.keys(),
            ..Self::default()
        }
    }

    /// Reconciles stored preferences with the current column set.
    ///
    /// Columns missing from the stored order are appended in declaration
    /// order; references to columns that no longer exist are dropped
    /// everywhere; mandatory columns are un-hidden; sub-row membership is
    /// limited to columns that allow it.
    pub fn merged(mut self, columns: &ColumnSet) -> Self {
        self.column_order = reconcile_order(
            &self.column_order,
            columns.iter().map(|c| c.key.as_str()),
            |key| columns.contains(key),
        );

        self.hidden_columns
            .retain(|key| columns.get(key).is_some_and(|c| !c.mandatory));
        self.column_widths.retain(|key, _| columns.contains(key));
        self.column_headers
            .retain(|key, header| columns.contains(key) && !header.trim().is_empty());
        self.sub_row_columns
            .retain(|key| columns.get(key).is_some_and(|c| c.sub_row));

        let members = &self.sub_row_columns;
        self.sub_row_column_order = reconcile_order(
            &self.sub_row_column_order,
            self.column_order.iter().map(String::as_str),
            |key| members.contains(key),
        );

        self.filters.retain(|f| columns.contains(&f.column));
        if self
            .sort
            .as_ref()
            .is_some_and(|s| !columns.contains(&s.column))
        {
            self.sort = None;
        }
        self.page_size = self.page_size.filter(|&n| n > 0);

        self
    }

    /// Returns `true` if the column is hidden.
    pub fn is_hidden(&self, key: &str) -> bool {
        self.hidden_columns.contains(key)
    }

    /// Returns `true` if the column renders in the sub-row.
    pub fn is_sub_row(&self, key: &str) -> bool {
        self.sub_row_columns.contains(key)
    }

    /// Returns the user's width override for a column.
    pub fn width(&self, key: &str) -> Option<u32> {
        self.column_widths.get(key).copied()
    }

    /// Returns the user's header override for a column.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.column_headers.get(key).map(String::as_str)
    }
}

/// Keeps the valid, first occurrence of each key in `stored`, then appends
/// every key of `all` that passes `keep` and was not seen yet.
fn reconcile_order<'a>(
    stored: &[String],
    all: impl Iterator<Item = &'a str>,
    keep: impl Fn(&str) -> bool,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut order: Vec<String> = stored
        .iter()
        .filter(|key| keep(key.as_str()) && seen.insert(key.to_string()))
        .cloned()
        .collect();
    for key in all {
        if keep(key) && seen.insert(key.to_string()) {
            order.push(key.to_string());
        }
    }
    order
}
