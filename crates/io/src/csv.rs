// CSV/TSV import

use std::path::Path;

use logirecon_recon::{Cell, Table};

pub fn load_path(path: &Path) -> Result<Table, String> {
    let bytes = std::fs::read(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    load_str(&decode(bytes))
}

/// Parse CSV text. The first record is the header; every other field is text.
pub fn load_str(content: &str) -> Result<Table, String> {
    let delimiter = sniff_delimiter(content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let headers = match records.next() {
        Some(record) => record
            .map_err(|e| e.to_string())?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect(),
        None => return Err("CSV input is empty".to_string()),
    };

    let mut table = Table::new(headers);
    for record in records {
        let record = record.map_err(|e| e.to_string())?;
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        table.push_row(
            record
                .iter()
                .map(|f| if f.is_empty() { Cell::Empty } else { Cell::Text(f.to_string()) })
                .collect(),
        );
    }

    Ok(table)
}

const DELIMITERS: [u8; 4] = [b';', b'\t', b',', b'|'];
const SNIFF_LINES: usize = 10;

/// Pick the delimiter whose field count is stable across the first lines.
///
/// A candidate must split the header into at least two fields; it scores
/// (lines with the header's field count) x (header field count). Ties go to
/// the earlier entry in `DELIMITERS`, so `;` (the local spreadsheet default)
/// wins over `,`.
fn sniff_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content.lines().take(SNIFF_LINES).collect();

    DELIMITERS
        .iter()
        .filter_map(|&delim| {
            let widths: Vec<usize> = sample.iter().map(|line| field_count(line, delim)).collect();
            let header = *widths.first()?;
            if header < 2 {
                return None;
            }
            let agreeing = widths.iter().filter(|&&w| w == header).count();
            Some((delim, agreeing * header))
        })
        .fold(None, |best: Option<(u8, usize)>, candidate| match best {
            Some(b) if b.1 >= candidate.1 => Some(b),
            _ => Some(candidate),
        })
        .map(|(delim, _)| delim)
        .unwrap_or(b',')
}

fn field_count(line: &str, delimiter: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(Result::ok)
        .map_or(1, |record| record.len())
}

/// UTF-8 when valid; otherwise Windows-1257, the Baltic code page legacy
/// accounting and courier exports are saved in.
fn decode(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| {
        let (text, _, had_errors) = encoding_rs::WINDOWS_1257.decode(e.as_bytes());
        if had_errors {
            log::warn!("input is neither UTF-8 nor Windows-1257; some characters were replaced");
        }
        text.into_owned()
    })
}
