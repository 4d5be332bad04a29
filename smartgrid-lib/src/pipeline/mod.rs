//! Client-side data pipeline: global search, column filters, sort.
//!
//! The stages always run in that order. Selection elsewhere in the grid is
//! tracked by index into the pipeline's output, so the order must not change.

mod filter;
mod search;
mod sort;

pub use filter::*;
pub use search::*;
pub use sort::*;

use crate::model::ColumnSet;
use crate::model::Row;

/// Everything the pipeline needs besides the rows themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineQuery {
    /// Free-text global search.
    pub search: String,
    /// When `false` the search text is assumed applied upstream and skipped.
    pub client_search: bool,
    /// Column filter predicates, combined with AND.
    pub filters: Vec<FilterPredicate>,
    /// Active sort, if any.
    pub sort: Option<SortSpec>,
}

impl PipelineQuery {
    /// Creates an empty query with client-side search enabled.
    pub fn new() -> Self {
        Self {
            client_search: true,
            ..Self::default()
        }
    }

    /// Sets the global search text.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Enables or disables client-side search.
    pub fn with_client_search(mut self, enabled: bool) -> Self {
        self.client_search = enabled;
        self
    }

    /// Adds a column filter.
    pub fn with_filter(mut self, filter: FilterPredicate) -> Self {
        self.filters.push(filter);
        self
    }

    /// Sets the sort.
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// Pure transformation from the full row set to the rows to render.
///
/// # Example
///
/// ```
/// use smartgrid_lib::model::{ColumnDef, ColumnSet, Row};
/// use smartgrid_lib::pipeline::{DataPipeline, PipelineQuery, SortSpec};
///
/// let columns = ColumnSet::new(vec![ColumnDef::new("id", "Id")]).unwrap();
/// let rows = vec![
///     Row::new().set("id", 1),
///     Row::new().set("id", 3),
///     Row::new().set("id", 2),
/// ];
///
/// let query = PipelineQuery::new().with_sort(SortSpec::desc("id"));
/// let out = DataPipeline::apply(&rows, &columns, &query);
/// let ids: Vec<String> = out.iter().map(|r| r.get("id").display_text()).collect();
/// assert_eq!(ids, ["3", "2", "1"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DataPipeline;

impl DataPipeline {
    /// Runs search, filters and sort, returning indices into `rows`.
    pub fn apply_indices(rows: &[Row], columns: &ColumnSet, query: &PipelineQuery) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..rows.len()).collect();

        let needle = normalize_query(&query.search).filter(|_| query.client_search);
        if let Some(needle) = needle {
            indices.retain(|&i| row_matches(&rows[i], columns, &needle));
        }

        let local_filters: Vec<&FilterPredicate> = query
            .filters
            .iter()
            .filter(|f| f.is_active())
            .filter(|f| columns.get(&f.column).is_some_and(|c| c.filters_locally()))
            .collect();
        if !local_filters.is_empty() {
            indices.retain(|&i| {
                local_filters
                    .iter()
                    .all(|f| f.matches(rows[i].get(&f.column)))
            });
        }

        if let Some(sort) = &query.sort {
            indices.sort_by(|&a, &b| sort.compare(&rows[a], &rows[b]));
        }

        log::debug!(
            "pipeline: {} rows -> {} (filters: {}, sort: {:?})",
            rows.len(),
            indices.len(),
            local_filters.len(),
            query.sort
        );

        indices
    }

    /// Runs search, filters and sort, returning the surviving rows.
    pub fn apply(rows: &[Row], columns: &ColumnSet, query: &PipelineQuery) -> Vec<Row> {
        Self::apply_indices(rows, columns, query)
            .into_iter()
            .map(|i| rows[i].clone())
            .collect()
    }
}
