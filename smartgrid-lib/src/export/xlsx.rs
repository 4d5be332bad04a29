use rust_xlsxwriter::Format;
use rust_xlsxwriter::Workbook;

use crate::error::ExportError;
use crate::model::CellValue;
use crate::model::ColumnDef;
use crate::model::Row;

/// Renders rows as an `.xlsx` workbook with a single sheet.
///
/// The header row is bold. Numeric cells are written as numbers, null cells
/// are left blank, everything else is written as display text.
pub fn to_xlsx(columns: &[&ColumnDef], rows: &[Row], sheet: &str) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    if !sheet.trim().is_empty() {
        worksheet.set_name(sheet.trim())?;
    }

    let bold = Format::new().set_bold();
    for (c, column) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col(c)?, &column.label, &bold)?;
    }

    for (r, row) in rows.iter().enumerate() {
        let r = u32::try_from(r + 1)
            .map_err(|_| ExportError::spreadsheet("too many rows for one sheet"))?;
        for (c, column) in columns.iter().enumerate() {
            let c = col(c)?;
            match row.get(&column.key).unwrap_styled() {
                CellValue::Null => {}
                CellValue::Number(n) => {
                    worksheet.write_number(r, c, *n)?;
                }
                other => {
                    worksheet.write_string(r, c, other.display_text())?;
                }
            }
        }
    }

    let bytes = workbook.save_to_buffer()?;
    log::debug!(
        "exported {} rows x {} columns to xlsx ({} bytes)",
        rows.len(),
        columns.len(),
        bytes.len()
    );
    Ok(bytes)
}

fn col(index: usize) -> Result<u16, ExportError> {
    u16::try_from(index).map_err(|_| ExportError::spreadsheet("too many columns for one sheet"))
}
