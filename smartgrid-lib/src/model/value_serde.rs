//! JSON (de)serialization for cell values and rows.
//!
//! Rows arrive from the gateway as plain JSON objects. Cell values follow the
//! mapping documented on [`CellValue`]; a styled value serializes back to
//! `{"value": ..., "variant": ...}` so a row survives a round trip unchanged.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde::ser::SerializeMap;

use super::CellValue;
use super::Row;

impl Serialize for CellValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serde_json::Value::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(CellValue::from)
    }
}

// =============================================================================
// Row
// =============================================================================

impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        let mut keys: Vec<&String> = self.fields.keys().collect();
        keys.sort();
        for key in keys {
            map.serialize_entry(key, &self.fields[key])?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RowVisitor)
    }
}

struct RowVisitor;

impl<'de> Visitor<'de> for RowVisitor {
    type Value = Row;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON object representing a grid row")
    }

    fn visit_map<M>(self, mut map: M) -> Result<Row, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut fields = HashMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(key) = map.next_key::<String>()? {
            let value: CellValue = map.next_value()?;
            fields.insert(key, value);
        }
        Ok(Row { fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StyledValue;

    #[test]
    fn test_deserialize_row_with_badge() {
        let json = r#"{"id": 1, "status": {"value": "Open", "variant": "badge-blue"}}"#;
        let row: Row = serde_json::from_str(json).unwrap();

        assert_eq!(row.get("id"), &CellValue::Number(1.0));
        assert_eq!(
            row.get("status"),
            &CellValue::Styled(StyledValue::new("Open", "badge-blue"))
        );
    }

    #[test]
    fn test_row_round_trip() {
        let row = Row::new()
            .set("trip", "T-100")
            .set("wagons", vec!["W1", "W2"])
            .set("status", StyledValue::new("Open", "badge-blue"));

        let json = serde_json::to_string(&row).unwrap();
        let back: Row = serde_json::from_str(&json).unwrap();
        assert_eq!(row, back);
    }

    #[test]
    fn test_serialize_is_key_ordered() {
        let row = Row::new().set("b", 2).set("a", 1);
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"{"a":1.0,"b":2.0}"#);
    }
}
