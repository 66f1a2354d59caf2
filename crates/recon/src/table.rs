//! Loaded tabular data: header names plus rows of typed cells, in source order.

use std::fmt;

use serde::Serialize;

/// Which input a table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableRole {
    /// Logistics export (VENIPAK).
    Shipments,
    /// Accounting export (RIVILE).
    Sales,
}

impl fmt::Display for TableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shipments => write!(f, "shipments"),
            Self::Sales => write!(f, "sales"),
        }
    }
}

/// A single loaded cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Int(i64),
    Bool(bool),
    /// Excel serial date (1900 system).
    DateTime(f64),
    /// Spreadsheet error literal, e.g. `#DIV/0!`.
    Error(String),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Text form used for identifiers and names. `None` for empty cells.
    ///
    /// Whole numbers render without a decimal point so a numeric shipment
    /// number `123456.0` joins against the text `"123456"`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) => Some(format_number(*n)),
            Cell::Int(n) => Some(n.to_string()),
            Cell::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
            Cell::DateTime(serial) => Some(format_number(*serial)),
            Cell::Error(e) => Some(e.clone()),
        }
    }

    /// Numeric form used for monetary columns.
    ///
    /// `Ok(None)` for empty or blank cells; `Err(raw)` when the cell holds
    /// something that is not an amount.
    pub fn to_amount(&self) -> Result<Option<f64>, String> {
        match self {
            Cell::Empty => Ok(None),
            Cell::Number(n) if n.is_finite() => Ok(Some(*n)),
            Cell::Int(n) => Ok(Some(*n as f64)),
            Cell::Text(s) => parse_amount(s),
            other => Err(other.to_text().unwrap_or_default()),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Parse a monetary string as exported by accounting tools.
///
/// Accepts `1234.5`, `1234,5`, `1 234,50` (space or NBSP grouping),
/// `1,234.50` and `1.234,50`. Blank input is `Ok(None)`.
pub fn parse_amount(raw: &str) -> Result<Option<f64>, String> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .collect();
    if compact.is_empty() {
        return Ok(None);
    }

    // With both separators present, the last one is the decimal point
    let normalized = match (compact.rfind(','), compact.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => compact.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => compact.replace(',', ""),
        (Some(_), None) => compact.replace(',', "."),
        (None, _) => compact,
    };

    match normalized.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(raw.to_string()),
    }
}

/// A loaded sheet: row 0 of the source becomes `headers`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self { headers, rows: Vec::new() }
    }

    /// Append a row, padding it to the header width. A row wider than the
    /// header grows the table with unnamed columns so no cell is lost.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        if row.len() > self.headers.len() {
            self.headers.resize(row.len(), String::new());
            for existing in &mut self.rows {
                existing.resize(row.len(), Cell::Empty);
            }
        }
        row.resize(self.headers.len(), Cell::Empty);
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Locate a column by header. Exact match wins; otherwise the first header
    /// equal to `name` after trimming surrounding whitespace.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .or_else(|| self.headers.iter().position(|h| h.trim() == name.trim()))
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&Cell::Empty)
    }
}
