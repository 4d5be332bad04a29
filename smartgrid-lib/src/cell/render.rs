//! Read-only cell presentation.
//!
//! [`render_cell`] is a fixed dispatch from [`ColumnType`] to a [`CellView`].
//! Hosts draw the view with whatever toolkit they use.

use crate::model::CellValue;
use crate::model::ColumnDef;
use crate::model::ColumnOption;
use crate::model::ColumnType;
use crate::model::Row;

/// Variant used for badges with no style tag and no status mapping.
pub const DEFAULT_BADGE_VARIANT: &str = "default";

/// Kind of inline input an editable cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Free text box.
    Text,
    /// Numeric box.
    Number,
    /// Date picker.
    Date,
}

/// What a cell presents.
#[derive(Debug, Clone, PartialEq)]
pub enum CellView {
    /// Plain text.
    Text(String),
    /// Right-aligned number.
    Number(String),
    /// Status pill.
    Badge { text: String, variant: String },
    /// Clickable text.
    Link { text: String },
    /// Start and end stacked on two lines.
    DateRange { start: String, end: String },
    /// First item with a "+N" popover holding the rest.
    Expandable {
        first: String,
        more: usize,
        hidden: Vec<String>,
    },
    /// Single-select showing the chosen option.
    Dropdown {
        selected: Option<String>,
        value: String,
        options: Vec<ColumnOption>,
    },
    /// Inline input box.
    Input { text: String, kind: InputKind },
}

impl CellView {
    /// Returns the text a screen reader or a plain-text dump would show.
    pub fn text(&self) -> String {
        match self {
            CellView::Text(t) | CellView::Number(t) => t.clone(),
            CellView::Badge { text, .. } | CellView::Link { text } => text.clone(),
            CellView::DateRange { start, end } if end.is_empty() => start.clone(),
            CellView::DateRange { start, end } => format!("{start} - {end}"),
            CellView::Expandable { first, more: 0, .. } => first.clone(),
            CellView::Expandable { first, more, .. } => format!("{first} +{more}"),
            CellView::Dropdown {
                selected, value, ..
            } => selected.clone().unwrap_or_else(|| value.clone()),
            CellView::Input { text, .. } => text.clone(),
        }
    }
}

/// Maps a column's type and a cell value to its presentation.
pub fn render_cell(column: &ColumnDef, value: &CellValue) -> CellView {
    match column.column_type {
        ColumnType::Badge => render_badge(column, value),
        ColumnType::Link => CellView::Link {
            text: value.display_text(),
        },
        ColumnType::DateTimeRange => render_date_range(value),
        ColumnType::ExpandableCount => render_expandable(value),
        ColumnType::Dropdown => render_dropdown(column, value),
        ColumnType::Number => CellView::Number(value.display_text()),
        ColumnType::EditableText => CellView::Input {
            text: value.display_text(),
            kind: InputKind::Text,
        },
        ColumnType::EditableNumber => CellView::Input {
            text: value.display_text(),
            kind: InputKind::Number,
        },
        ColumnType::EditableDate => CellView::Input {
            text: value.display_text(),
            kind: InputKind::Date,
        },
        ColumnType::Text | ColumnType::DateTime => CellView::Text(value.display_text()),
    }
}

/// Forwards a click on `row`'s cell in `column` to the column's click
/// capability. Returns `false` if the column has none.
pub fn click_cell(column: &ColumnDef, row: &Row) -> bool {
    match column.click_handler() {
        Some(handler) => {
            handler.on_click(row, &column.key);
            true
        }
        None => false,
    }
}

fn render_badge(column: &ColumnDef, value: &CellValue) -> CellView {
    let text = value.display_text();
    let variant = value
        .variant()
        .or_else(|| column.status_variant(&text))
        .unwrap_or(DEFAULT_BADGE_VARIANT)
        .to_string();
    CellView::Badge { text, variant }
}

fn render_date_range(value: &CellValue) -> CellView {
    match value.unwrap_styled() {
        CellValue::List(items) => CellView::DateRange {
            start: items.first().map(CellValue::display_text).unwrap_or_default(),
            end: items.get(1).map(CellValue::display_text).unwrap_or_default(),
        },
        CellValue::Object(map) => CellView::DateRange {
            start: map.get("start").map(CellValue::display_text).unwrap_or_default(),
            end: map.get("end").map(CellValue::display_text).unwrap_or_default(),
        },
        other => {
            let text = other.display_text();
            match text.split_once(" - ") {
                Some((start, end)) => CellView::DateRange {
                    start: start.trim().to_string(),
                    end: end.trim().to_string(),
                },
                None => CellView::DateRange {
                    start: text,
                    end: String::new(),
                },
            }
        }
    }
}

fn render_expandable(value: &CellValue) -> CellView {
    let items: Vec<String> = value
        .items()
        .iter()
        .filter(|v| !v.is_null())
        .map(CellValue::display_text)
        .collect();
    match items.split_first() {
        Some((first, rest)) => CellView::Expandable {
            first: first.clone(),
            more: rest.len(),
            hidden: rest.to_vec(),
        },
        None => CellView::Text(String::new()),
    }
}

fn render_dropdown(column: &ColumnDef, value: &CellValue) -> CellView {
    let value = value.display_text();
    let selected = column
        .options
        .iter()
        .find(|o| o.value == value)
        .map(|o| o.label.clone());
    CellView::Dropdown {
        selected,
        value,
        options: column.options.clone(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use super::*;
    use crate::model::StyledValue;

    #[test]
    fn test_badge_prefers_value_tag_then_status_map() {
        let column = ColumnDef::new("status", "Status")
            .with_type(ColumnType::Badge)
            .status("Closed", "badge-red");

        let tagged = CellValue::from(StyledValue::new("Open", "badge-blue"));
        assert_eq!(
            render_cell(&column, &tagged),
            CellView::Badge {
                text: "Open".into(),
                variant: "badge-blue".into()
            }
        );

        let mapped = render_cell(&column, &CellValue::from("Closed"));
        assert_eq!(
            mapped,
            CellView::Badge {
                text: "Closed".into(),
                variant: "badge-red".into()
            }
        );

        let unknown = render_cell(&column, &CellValue::from("Draft"));
        assert!(matches!(unknown, CellView::Badge { variant, .. } if variant == "default"));
    }

    #[test]
    fn test_expandable_counts_hidden_items() {
        let column = ColumnDef::new("wagons", "Wagons").with_type(ColumnType::ExpandableCount);
        let view = render_cell(&column, &CellValue::from(vec!["W1", "W2", "W3"]));

        assert_eq!(view.text(), "W1 +2");
        assert!(matches!(view, CellView::Expandable { more: 2, .. }));
    }

    #[test]
    fn test_date_range_from_list_and_text() {
        let column = ColumnDef::new("window", "Window").with_type(ColumnType::DateTimeRange);

        let from_list = render_cell(&column, &CellValue::from(vec!["08:00", "10:30"]));
        assert_eq!(
            from_list,
            CellView::DateRange {
                start: "08:00".into(),
                end: "10:30".into()
            }
        );

        let from_text = render_cell(&column, &CellValue::from("Mon - Tue"));
        assert_eq!(from_text.text(), "Mon - Tue");
    }

    #[test]
    fn test_dropdown_shows_option_label() {
        let column = ColumnDef::new("priority", "Priority")
            .with_type(ColumnType::Dropdown)
            .option("High", "H")
            .option("Low", "L");
        let view = render_cell(&column, &CellValue::from("H"));
        assert_eq!(view.text(), "High");
    }

    #[test]
    fn test_click_reaches_capability() {
        let clicks = Arc::new(Mutex::new(Vec::new()));
        let sink = clicks.clone();
        let column = ColumnDef::new("trip", "Trip")
            .with_type(ColumnType::Link)
            .on_click(move |row: &Row, key: &str| {
                sink.lock()
                    .unwrap()
                    .push(format!("{}:{}", key, row.get("trip").display_text()));
            });

        assert!(click_cell(&column, &Row::new().set("trip", "T-9")));
        assert_eq!(*clicks.lock().unwrap(), vec!["trip:T-9".to_string()]);
        assert!(!click_cell(&ColumnDef::new("x", "X"), &Row::new()));
    }
}
