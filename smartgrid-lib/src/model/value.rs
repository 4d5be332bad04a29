//! Cell value enum for dynamic row fields

use std::collections::BTreeMap;
use std::fmt;

/// A display string paired with a visual style tag.
///
/// Status columns carry these so the same value can be rendered as a
/// colored pill while still filtering and exporting as plain text.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledValue {
    /// The underlying value.
    pub value: Box<CellValue>,
    /// Style tag (e.g. `"badge-blue"`), if the source supplied one.
    pub variant: Option<String>,
}

impl StyledValue {
    /// Creates a styled value with the given style tag.
    pub fn new(value: impl Into<CellValue>, variant: impl Into<String>) -> Self {
        Self {
            value: Box::new(value.into()),
            variant: Some(variant.into()),
        }
    }

    /// Creates a styled value without a style tag.
    pub fn plain(value: impl Into<CellValue>) -> Self {
        Self {
            value: Box::new(value.into()),
            variant: None,
        }
    }
}

/// A dynamic value stored in a row cell.
///
/// This is the closed set of shapes a cell can hold. Renderers, the data
/// pipeline and the exporters all read cells through the normalisation
/// methods on this type instead of unwrapping shapes themselves.
///
/// # JSON Mapping
///
/// | JSON | Variant |
/// |------|---------|
/// | `null` | `Null` |
/// | `true` / `false` | `Bool` |
/// | number | `Number` |
/// | string | `Text` |
/// | object with a `value` key | `Styled` |
/// | any other object | `Object` |
/// | array | `List` |
///
/// # Example
///
/// ```
/// use smartgrid_lib::model::{CellValue, StyledValue};
///
/// let status = CellValue::from(StyledValue::new("Open", "badge-blue"));
/// assert_eq!(status.display_text(), "Open");
///
/// let wagons = CellValue::List(vec!["W1".into(), "W2".into()]);
/// assert_eq!(wagons.display_text(), "W1; W2");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Empty cell.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// Text value.
    Text(String),
    /// Value with a style tag.
    Styled(StyledValue),
    /// Multi-value cell.
    List(Vec<CellValue>),
    /// Arbitrary nested object.
    Object(BTreeMap<String, CellValue>),
}

/// Separator used when a multi-value cell is flattened to text.
pub const LIST_SEPARATOR: &str = "; ";

impl CellValue {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Returns `true` for null values and blank text.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Styled(s) => s.value.is_empty(),
            CellValue::List(items) => items.iter().all(CellValue::is_empty),
            CellValue::Object(map) => map.values().all(CellValue::is_empty),
            _ => false,
        }
    }

    /// Strips any style tag, returning the underlying value.
    pub fn unwrap_styled(&self) -> &CellValue {
        match self {
            CellValue::Styled(styled) => styled.value.unwrap_styled(),
            other => other,
        }
    }

    /// Returns the style tag, if this value carries one.
    pub fn variant(&self) -> Option<&str> {
        match self {
            CellValue::Styled(styled) => styled.variant.as_deref(),
            _ => None,
        }
    }

    /// Returns the text a user sees for this value.
    ///
    /// Styled values unwrap to their value, lists and objects flatten their
    /// scalars joined with [`LIST_SEPARATOR`], null is the empty string.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
            CellValue::Styled(styled) => styled.value.display_text(),
            CellValue::List(items) => join_texts(items.iter()),
            CellValue::Object(map) => join_texts(map.values()),
        }
    }

    /// Returns the text of every scalar nested anywhere in this value.
    ///
    /// Null scalars are skipped. Used by global search, which matches a row
    /// when any nested scalar contains the query.
    pub fn scalar_texts(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_scalars(&mut out);
        out
    }

    fn collect_scalars(&self, out: &mut Vec<String>) {
        match self {
            CellValue::Null => {}
            CellValue::Styled(styled) => styled.value.collect_scalars(out),
            CellValue::List(items) => items.iter().for_each(|v| v.collect_scalars(out)),
            CellValue::Object(map) => map.values().for_each(|v| v.collect_scalars(out)),
            scalar => out.push(scalar.display_text()),
        }
    }

    /// Parses this value as a number.
    ///
    /// Numbers return themselves, text is trimmed and parsed, styled values
    /// unwrap first. Everything else is `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self.unwrap_styled() {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => parse_number(s),
            _ => None,
        }
    }

    /// Returns the list elements, or a one-element slice for any other value.
    pub fn items(&self) -> &[CellValue] {
        match self.unwrap_styled() {
            CellValue::List(items) => items,
            other => std::slice::from_ref(other),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

/// Parses user or cell text as a number, ignoring surrounding whitespace.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn join_texts<'a>(values: impl Iterator<Item = &'a CellValue>) -> String {
    values
        .filter(|v| !v.is_null())
        .map(CellValue::display_text)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Number(v as f64)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Number(v as f64)
    }
}

impl From<u32> for CellValue {
    fn from(v: u32) -> Self {
        CellValue::Number(v as f64)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<StyledValue> for CellValue {
    fn from(v: StyledValue) -> Self {
        CellValue::Styled(v)
    }
}

impl<T: Into<CellValue>> From<Vec<T>> for CellValue {
    fn from(v: Vec<T>) -> Self {
        CellValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => CellValue::Null,
        }
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => CellValue::Null,
            serde_json::Value::Bool(b) => CellValue::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or_default(),
            serde_json::Value::String(s) => CellValue::Text(s),
            serde_json::Value::Array(arr) => {
                CellValue::List(arr.into_iter().map(CellValue::from).collect())
            }
            serde_json::Value::Object(mut obj) => match obj.remove("value") {
                Some(value) => {
                    let variant = match obj.remove("variant") {
                        Some(serde_json::Value::String(s)) => Some(s),
                        _ => None,
                    };
                    CellValue::Styled(StyledValue {
                        value: Box::new(CellValue::from(value)),
                        variant,
                    })
                }
                None => CellValue::Object(
                    obj.into_iter()
                        .map(|(k, v)| (k, CellValue::from(v)))
                        .collect(),
                ),
            },
        }
    }
}

impl From<&CellValue> for serde_json::Value {
    fn from(value: &CellValue) -> Self {
        match value {
            CellValue::Null => serde_json::Value::Null,
            CellValue::Bool(b) => serde_json::Value::Bool(*b),
            CellValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            CellValue::Text(s) => serde_json::Value::String(s.clone()),
            CellValue::Styled(styled) => {
                let mut obj = serde_json::Map::new();
                obj.insert("value".to_string(), styled.value.as_ref().into());
                if let Some(variant) = &styled.variant {
                    obj.insert(
                        "variant".to_string(),
                        serde_json::Value::String(variant.clone()),
                    );
                }
                serde_json::Value::Object(obj)
            }
            CellValue::List(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            CellValue::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_text_unwraps_styled() {
        let value = CellValue::from(StyledValue::new("Closed", "badge-red"));
        assert_eq!(value.display_text(), "Closed");
        assert_eq!(value.variant(), Some("badge-red"));
    }

    #[test]
    fn test_integral_numbers_print_without_fraction() {
        assert_eq!(CellValue::from(42).display_text(), "42");
        assert_eq!(CellValue::from(2.5).display_text(), "2.5");
    }

    #[test]
    fn test_scalar_texts_flatten_nested_values() {
        let json = serde_json::json!({
            "origin": "Basel",
            "stops": ["Olten", {"value": "Bern", "variant": "badge-green"}],
            "empty": null
        });
        let mut texts = CellValue::from(json).scalar_texts();
        texts.sort();
        assert_eq!(texts, vec!["Basel", "Bern", "Olten"]);
    }

    #[test]
    fn test_as_number_parses_text() {
        assert_eq!(CellValue::from(" 12.5 ").as_number(), Some(12.5));
        assert_eq!(CellValue::from("abc").as_number(), None);
        assert_eq!(CellValue::Null.as_number(), None);
    }

    #[test]
    fn test_json_object_without_value_key_is_object() {
        let value = CellValue::from(serde_json::json!({"a": 1}));
        assert!(matches!(value, CellValue::Object(_)));
    }
}
