// Spreadsheet import (xlsx, xlsm, xlsb, xls, ods) - first sheet only

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use logirecon_recon::{Cell, Table};

/// Spreadsheet MIME type for the generated report.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Load the first sheet of an in-memory spreadsheet document.
pub fn load_first_sheet(bytes: &[u8]) -> Result<Table, String> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| format!("Failed to open spreadsheet: {}", e))?;
    read_first_sheet(&mut workbook)
}

/// Load the first sheet of a spreadsheet file on disk.
pub fn load_path(path: &Path) -> Result<Table, String> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
    read_first_sheet(&mut workbook)
}

fn read_first_sheet<RS: Read + Seek>(workbook: &mut Sheets<RS>) -> Result<Table, String> {
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| "Spreadsheet contains no sheets".to_string())?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("Failed to read sheet '{}': {}", sheet_name, e))?;

    let table = table_from_range(&range)
        .ok_or_else(|| format!("Sheet '{}' is empty", sheet_name))?;
    log::debug!(
        "loaded sheet '{}': {} columns, {} rows",
        sheet_name,
        table.headers.len(),
        table.len()
    );
    Ok(table)
}

/// First row of the used range becomes the header; rows with no values are skipped.
fn table_from_range(range: &Range<Data>) -> Option<Table> {
    let mut rows = range.rows();
    let header_row = rows.next()?;

    let headers = header_row
        .iter()
        .map(|d| cell_from_data(d).to_text().unwrap_or_default())
        .collect();
    let mut table = Table::new(headers);

    for row in rows {
        let cells: Vec<Cell> = row.iter().map(cell_from_data).collect();
        if cells.iter().all(Cell::is_empty) {
            continue;
        }
        table.push_row(cells);
    }

    Some(table)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Int(*n),
        Data::Bool(b) => Cell::Bool(*b),
        // Assumes the 1900 date system (calamine does not expose the 1904 flag)
        Data::DateTime(dt) => Cell::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Error(e.to_string()),
    }
}
