//! Global free-text search.

use crate::model::ColumnSet;
use crate::model::Row;

/// Returns `true` if any scalar in any column of `row` contains `needle`.
///
/// `needle` must already be lower-cased. Style tags are unwrapped and lists
/// and objects are searched element by element.
pub fn row_matches(row: &Row, columns: &ColumnSet, needle: &str) -> bool {
    columns.iter().any(|column| {
        row.get(&column.key)
            .scalar_texts()
            .iter()
            .any(|text| text.to_lowercase().contains(needle))
    })
}

/// Normalises user search input, returning `None` when it is blank.
pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnDef;
    use crate::model::StyledValue;

    #[test]
    fn test_search_reaches_nested_values() {
        let columns = ColumnSet::new(vec![
            ColumnDef::new("trip", "Trip"),
            ColumnDef::new("stops", "Stops"),
        ])
        .unwrap();
        let row = Row::new()
            .set("trip", "T-1")
            .set("stops", vec![StyledValue::new("Olten", "badge-grey")]);

        assert!(row_matches(&row, &columns, "olt"));
        assert!(!row_matches(&row, &columns, "badge"));
    }

    #[test]
    fn test_fields_outside_columns_are_ignored() {
        let columns = ColumnSet::new(vec![ColumnDef::new("trip", "Trip")]).unwrap();
        let row = Row::new().set("trip", "T-1").set("secret", "hidden");

        assert!(!row_matches(&row, &columns, "hidden"));
    }

    #[test]
    fn test_blank_query_is_none() {
        assert_eq!(normalize_query("   "), None);
        assert_eq!(normalize_query(" Basel "), Some("basel".to_string()));
    }
}
