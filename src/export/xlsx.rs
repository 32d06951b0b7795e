//! Spreadsheet export: a single worksheet with a bold header row.
//!
//! Number cells stay numeric; everything else is written as display text
//! with the same null and list handling as the csv export.

use crate::constants::{MAX_SHEET_COLUMNS, MAX_SHEET_ROWS, SHEET_NAME};
use crate::error::{ExportError, ExportResult};
use crate::format::cell_text;
use crate::types::{Column, ColumnKind, Row, Value};
use rust_xlsxwriter::{Format, Workbook};

/// Widest auto-sized column, in characters
const MAX_AUTO_WIDTH: usize = 50;

pub fn write_xlsx(rows: &[Row], columns: &[Column]) -> ExportResult<Vec<u8>> {
    if rows.len() + 1 > MAX_SHEET_ROWS || columns.len() > MAX_SHEET_COLUMNS {
        return Err(ExportError::SheetTooLarge {
            rows: rows.len(),
            columns: columns.len(),
        });
    }

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let mut widths: Vec<usize> = columns.iter().map(|c| c.label.chars().count()).collect();

    for (col_idx, column) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col_idx as u16, &column.label, &header)?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        let sheet_row = (row_idx + 1) as u32;
        for (col_idx, column) in columns.iter().enumerate() {
            let sheet_col = col_idx as u16;
            match row.get(&column.key) {
                Value::Number(n) if column.kind != ColumnKind::Date && n.is_finite() => {
                    worksheet.write_number(sheet_row, sheet_col, *n)?;
                }
                value => {
                    let text = cell_text(column, value);
                    if text.is_empty() {
                        continue;
                    }
                    widths[col_idx] = widths[col_idx].max(text.chars().count());
                    worksheet.write_string(sheet_row, sheet_col, &text)?;
                }
            }
        }
    }

    for (col_idx, width) in widths.iter().enumerate() {
        let width = (*width).clamp(8, MAX_AUTO_WIDTH) + 2;
        worksheet.set_column_width(col_idx as u16, width as f64)?;
    }

    Ok(workbook.save_to_buffer()?)
}
