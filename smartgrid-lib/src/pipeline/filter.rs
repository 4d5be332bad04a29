//! Column filter predicates.

use serde::Deserialize;
use serde::Serialize;

use crate::model::CellValue;
use crate::model::parse_number;

/// Comparison applied by a [`FilterPredicate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    /// Case-insensitive equality.
    Equals,
    /// Case-insensitive substring.
    Contains,
    /// Case-insensitive prefix.
    StartsWith,
    /// Case-insensitive suffix.
    EndsWith,
    /// Numeric greater than.
    Gt,
    /// Numeric less than.
    Lt,
    /// Numeric greater than or equal.
    Gte,
    /// Numeric less than or equal.
    Lte,
}

impl FilterOperator {
    /// Returns `true` for operators that compare numbers.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            FilterOperator::Gt | FilterOperator::Lt | FilterOperator::Gte | FilterOperator::Lte
        )
    }

    /// Every operator, in the order the filter menu lists them.
    pub const ALL: [FilterOperator; 8] = [
        FilterOperator::Equals,
        FilterOperator::Contains,
        FilterOperator::StartsWith,
        FilterOperator::EndsWith,
        FilterOperator::Gt,
        FilterOperator::Lt,
        FilterOperator::Gte,
        FilterOperator::Lte,
    ];
}

/// A filter on one column.
///
/// Predicates on different columns combine with logical AND. A predicate
/// whose value is blank is inactive and matches every row, so a cleared
/// filter input never empties the grid.
///
/// # Example
///
/// ```
/// use smartgrid_lib::model::CellValue;
/// use smartgrid_lib::pipeline::FilterPredicate;
///
/// let open = FilterPredicate::equals("status", "open");
/// assert!(open.matches(&CellValue::from("Open")));
///
/// let heavy = FilterPredicate::gte("weight", "80");
/// assert!(heavy.matches(&CellValue::from(80)));
/// assert!(!heavy.matches(&CellValue::from("n/a")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPredicate {
    /// Column key the predicate applies to.
    pub column: String,
    /// User-entered comparison value.
    pub value: String,
    /// Comparison operator.
    pub operator: FilterOperator,
}

impl FilterPredicate {
    /// Creates a predicate.
    pub fn new(
        column: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
            operator,
        }
    }

    /// Creates an equality predicate.
    pub fn equals(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(column, FilterOperator::Equals, value)
    }

    /// Creates a substring predicate.
    pub fn contains(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(column, FilterOperator::Contains, value)
    }

    /// Creates a prefix predicate.
    pub fn starts_with(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(column, FilterOperator::StartsWith, value)
    }

    /// Creates a suffix predicate.
    pub fn ends_with(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(column, FilterOperator::EndsWith, value)
    }

    /// Creates a greater-than predicate.
    pub fn gt(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(column, FilterOperator::Gt, value)
    }

    /// Creates a less-than predicate.
    pub fn lt(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(column, FilterOperator::Lt, value)
    }

    /// Creates a greater-than-or-equal predicate.
    pub fn gte(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(column, FilterOperator::Gte, value)
    }

    /// Creates a less-than-or-equal predicate.
    pub fn lte(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(column, FilterOperator::Lte, value)
    }

    /// Returns `false` if the predicate value is blank.
    pub fn is_active(&self) -> bool {
        !self.value.trim().is_empty()
    }

    /// Evaluates the predicate against a cell.
    ///
    /// Style tags are unwrapped first. A multi-value cell matches when any of
    /// its elements does.
    pub fn matches(&self, cell: &CellValue) -> bool {
        if !self.is_active() {
            return true;
        }
        cell.items().iter().any(|item| self.matches_scalar(item))
    }

    fn matches_scalar(&self, item: &CellValue) -> bool {
        if self.operator.is_numeric() {
            let (Some(lhs), Some(rhs)) = (item.as_number(), parse_number(&self.value)) else {
                return false;
            };
            return match self.operator {
                FilterOperator::Gt => lhs > rhs,
                FilterOperator::Lt => lhs < rhs,
                FilterOperator::Gte => lhs >= rhs,
                FilterOperator::Lte => lhs <= rhs,
                _ => false,
            };
        }

        let text = item.display_text().to_lowercase();
        let needle = self.value.to_lowercase();
        match self.operator {
            FilterOperator::Equals => text == needle,
            FilterOperator::Contains => text.contains(&needle),
            FilterOperator::StartsWith => text.starts_with(&needle),
            FilterOperator::EndsWith => text.ends_with(&needle),
            _ => false,
        }
    }
}
