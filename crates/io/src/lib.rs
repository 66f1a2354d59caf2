// File I/O operations

pub mod csv;
pub mod layout;
pub mod report;
pub mod xlsx;

use std::path::Path;

use logirecon_recon::Table;

pub use report::{build_report, process, ProcessError, ReportOutput};

/// Load the first sheet of an input file. `.csv`/`.tsv`/`.txt` go through the
/// CSV reader, everything else through the spreadsheet reader.
pub fn load_table(path: &Path) -> Result<Table, String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" | "tsv" | "txt" => csv::load_path(path),
        _ => xlsx::load_path(path),
    }
}
