//! Tests for CSV and spreadsheet export.

use smartgrid_lib::export::ExportFormat;
use smartgrid_lib::export::Exporter;
use smartgrid_lib::export::to_csv;
use smartgrid_lib::model::ColumnDef;
use smartgrid_lib::model::Row;
use smartgrid_lib::model::StyledValue;

fn columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("trip", "Trip"),
        ColumnDef::new("status", "Status"),
        ColumnDef::new("weight", "Weight (t)"),
    ]
}

fn rows() -> Vec<Row> {
    vec![
        Row::new()
            .set("trip", "T-1")
            .set("status", StyledValue::new("Open", "badge-blue"))
            .set("weight", 1200.5),
        Row::new().set("trip", "T-2").set("weight", 800),
    ]
}

/// Splits simple CSV (no quoted fields) back into cells.
fn parse_simple_csv(csv: &str) -> Vec<Vec<String>> {
    csv.lines()
        .map(|line| line.split(',').map(str::to_string).collect())
        .collect()
}

#[test]
fn test_csv_round_trip_without_special_characters() {
    let columns = columns();
    let refs: Vec<&ColumnDef> = columns.iter().collect();
    let parsed = parse_simple_csv(&to_csv(&refs, &rows()));

    assert_eq!(parsed[0], ["Trip", "Status", "Weight (t)"]);
    assert_eq!(parsed[1], ["T-1", "Open", "1200.5"]);
    assert_eq!(parsed[2], ["T-2", "", "800"]);
}

#[test]
fn test_csv_quotes_embedded_separators() {
    let columns = vec![ColumnDef::new("note", "Note, remarks")];
    let refs: Vec<&ColumnDef> = columns.iter().collect();
    let rows = vec![Row::new().set("note", "line one\nsaid \"go\"")];

    assert_eq!(
        to_csv(&refs, &rows),
        "\"Note, remarks\"\n\"line one\nsaid \"\"go\"\"\"\n"
    );
}

#[test]
fn test_write_derives_extension() {
    let dir = tempfile::tempdir().unwrap();
    let columns = columns();
    let rows = rows();
    let exporter = Exporter::new(columns.iter().collect(), &rows);

    let csv_path = exporter.write(ExportFormat::Csv, dir.path().join("trips")).unwrap();
    assert_eq!(csv_path.extension().unwrap(), "csv");
    let written = std::fs::read_to_string(&csv_path).unwrap();
    assert!(written.starts_with("Trip,Status,Weight (t)\n"));

    let xlsx_path = exporter.write(ExportFormat::Xlsx, dir.path().join("trips")).unwrap();
    assert_eq!(xlsx_path.extension().unwrap(), "xlsx");
    assert!(std::fs::read(&xlsx_path).unwrap().starts_with(b"PK"));
}

#[test]
fn test_write_keeps_given_extension() {
    let dir = tempfile::tempdir().unwrap();
    let columns = columns();
    let rows = rows();

    let path = Exporter::new(columns.iter().collect(), &rows)
        .write(ExportFormat::Csv, dir.path().join("trips.txt"))
        .unwrap();
    assert_eq!(path.file_name().unwrap(), "trips.txt");
}

#[test]
fn test_write_to_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let columns = columns();
    let rows = rows();

    let result = Exporter::new(columns.iter().collect(), &rows)
        .write(ExportFormat::Csv, dir.path().join("missing").join("trips"));
    assert!(result.is_err());
}

#[test]
fn test_format_parses_from_str() {
    assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
    assert_eq!("excel".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
    assert!("pdf".parse::<ExportFormat>().is_err());
}
