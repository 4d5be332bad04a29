//! Where a grid's rows come from.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::FetchError;
use crate::model::Row;
use crate::pipeline::FilterPredicate;
use crate::pipeline::SortSpec;

/// Parameters of one remote page request.
///
/// Carries every filter, including the ones the grid evaluates locally, so a
/// gateway can choose to apply them all.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest {
    /// Zero-based page number.
    pub page: usize,
    pub page_size: usize,
    /// Global search text; empty when there is none.
    pub search: String,
    pub filters: Vec<FilterPredicate>,
    pub sort: Option<SortSpec>,
}

/// One page returned by a [`RowFetcher`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchedPage {
    rows: Vec<Row>,
    total_count: usize,
}

impl FetchedPage {
    /// Creates a page. `total_count` is the size of the full result set.
    pub fn new(rows: Vec<Row>, total_count: usize) -> Self {
        Self { rows, total_count }
    }

    /// Creates an empty page.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Consumes the page and returns its rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Total number of rows across all pages.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Number of pages of `page_size` rows needed for the full result set.
    pub fn page_count(&self, page_size: usize) -> usize {
        if page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(page_size)
    }
}

/// Fetches pages of rows from a remote service.
///
/// There is no retry and no cancellation; the grid keeps whichever response
/// arrives last.
#[async_trait]
pub trait RowFetcher: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchedPage, FetchError>;
}

/// Rows owned by the grid or fetched on demand.
#[derive(Clone)]
pub enum RowSource {
    /// All rows held in memory; paging happens locally.
    Local(Vec<Row>),
    /// Rows fetched page by page.
    Remote(Arc<dyn RowFetcher>),
}

impl RowSource {
    /// Returns `true` for a remote source.
    pub fn is_remote(&self) -> bool {
        matches!(self, RowSource::Remote(_))
    }
}

impl Default for RowSource {
    fn default() -> Self {
        RowSource::Local(Vec::new())
    }
}

impl std::fmt::Debug for RowSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowSource::Local(rows) => f.debug_tuple("Local").field(&rows.len()).finish(),
            RowSource::Remote(_) => f.write_str("Remote"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_rounds_up() {
        let page = FetchedPage::new(Vec::new(), 101);
        assert_eq!(page.page_count(25), 5);
        assert_eq!(page.page_count(0), 0);
        assert_eq!(FetchedPage::empty().page_count(25), 0);
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let request = FetchRequest {
            page: 2,
            page_size: 50,
            ..Default::default()
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["pageSize"], 50);
        assert_eq!(json["sort"], serde_json::Value::Null);
    }
}
