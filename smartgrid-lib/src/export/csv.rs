use crate::model::ColumnDef;
use crate::model::Row;

/// Renders rows as CSV with a header line of column labels.
///
/// Cells use their display text; lists are joined with `"; "`. Fields
/// containing a comma, quote, CR or LF are quoted with inner quotes doubled.
pub fn to_csv(columns: &[&ColumnDef], rows: &[Row]) -> String {
    let mut out = String::new();
    push_line(&mut out, columns.iter().map(|c| c.label.clone()));
    for row in rows {
        push_line(
            &mut out,
            columns.iter().map(|c| row.get(&c.key).display_text()),
        );
    }
    out
}

fn push_line(out: &mut String, fields: impl Iterator<Item = String>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape(&field));
    }
    out.push('\n');
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotes_special_characters() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_lists_and_nulls() {
        let columns = [ColumnDef::new("wagons", "Wagons"), ColumnDef::new("note", "Note")];
        let refs: Vec<&ColumnDef> = columns.iter().collect();
        let rows = vec![Row::new().set("wagons", vec!["W1", "W2"])];

        assert_eq!(to_csv(&refs, &rows), "Wagons,Note\nW1; W2,\n");
    }
}
