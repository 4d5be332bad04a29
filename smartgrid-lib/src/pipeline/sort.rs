//! Single-column sort.

use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;

use crate::model::CellValue;
use crate::model::Row;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9).
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl SortDirection {
    /// Returns the opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// The active sort of a grid: one column and a direction.
///
/// There is no secondary key; rows comparing equal keep their relative order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Column key to sort by.
    pub column: String,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Creates an ascending sort on a column.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Creates a descending sort on a column.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Computes the sort after a header click on `column`.
    ///
    /// Clicking the sorted column flips its direction; clicking any other
    /// column sorts it ascending.
    pub fn toggle(current: Option<&SortSpec>, column: &str) -> SortSpec {
        match current {
            Some(spec) if spec.column == column => SortSpec {
                column: spec.column.clone(),
                direction: spec.direction.flipped(),
            },
            _ => SortSpec::asc(column),
        }
    }

    /// Compares two rows under this sort.
    pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
        let ordering = compare_cells(a.get(&self.column), b.get(&self.column));
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Orders two cells: empty first, then numbers, then text.
///
/// Numbers compare with `total_cmp`, text by lower-cased display text. A
/// number is never compared against text.
pub fn compare_cells(a: &CellValue, b: &CellValue) -> Ordering {
    match (sort_key(a), sort_key(b)) {
        (SortKey::Empty, SortKey::Empty) => Ordering::Equal,
        (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(&y),
        (SortKey::Text(x), SortKey::Text(y)) => x.cmp(&y),
        (x, y) => x.rank().cmp(&y.rank()),
    }
}

enum SortKey {
    Empty,
    Number(f64),
    Text(String),
}

impl SortKey {
    fn rank(&self) -> u8 {
        match self {
            SortKey::Empty => 0,
            SortKey::Number(_) => 1,
            SortKey::Text(_) => 2,
        }
    }
}

fn sort_key(value: &CellValue) -> SortKey {
    if value.is_null() {
        SortKey::Empty
    } else if let Some(n) = value.as_number() {
        SortKey::Number(n)
    } else {
        SortKey::Text(value.display_text().to_lowercase())
    }
}
