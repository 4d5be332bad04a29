//! Loading grid descriptions and rows from JSON files.

use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use smartgrid_lib::GridConfig;
use smartgrid_lib::model::ColumnDef;
use smartgrid_lib::model::ColumnSet;
use smartgrid_lib::model::Row;
use smartgrid_lib::pipeline::FilterOperator;
use smartgrid_lib::pipeline::FilterPredicate;

use crate::error::CliError;

#[derive(Debug, Deserialize)]
struct GridFile {
    #[serde(default)]
    config: GridConfig,
    columns: Vec<ColumnDef>,
}

/// A parsed grid description.
pub struct GridDescription {
    pub config: GridConfig,
    pub columns: ColumnSet,
}

pub fn load_grid(path: &Path) -> Result<GridDescription, CliError> {
    let file: GridFile = read_json(path)?;
    Ok(GridDescription {
        config: file.config,
        columns: ColumnSet::new(file.columns)?,
    })
}

pub fn load_rows(path: Option<&Path>) -> Result<Vec<Row>, CliError> {
    match path {
        Some(path) => read_json(path),
        None => Ok(Vec::new()),
    }
}

/// Parses `column:operator:value`. The value may itself contain colons.
pub fn parse_filter(raw: &str) -> Result<FilterPredicate, CliError> {
    let mut parts = raw.splitn(3, ':');
    let (Some(column), Some(op), Some(value)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(CliError::Filter(raw.to_string()));
    };
    let operator: FilterOperator = serde_json::from_value(serde_json::Value::String(op.to_string()))
        .map_err(|_| CliError::Filter(raw.to_string()))?;
    Ok(FilterPredicate::new(column, operator, value))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_keeps_colons_in_value() {
        let filter = parse_filter("eta:startsWith:08:30").unwrap();
        assert_eq!(filter.column, "eta");
        assert_eq!(filter.operator, FilterOperator::StartsWith);
        assert_eq!(filter.value, "08:30");
    }

    #[test]
    fn test_parse_filter_rejects_unknown_operator() {
        assert!(parse_filter("eta:near:x").is_err());
        assert!(parse_filter("eta").is_err());
    }
}
