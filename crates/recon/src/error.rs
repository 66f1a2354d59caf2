use std::fmt;

use crate::table::TableRole;

#[derive(Debug, Clone, PartialEq)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad markup, sheet name collision, etc.).
    ConfigValidation(String),
    /// Missing required column in input data.
    MissingColumn { table: TableRole, column: String },
    /// A monetary cell could not be read as a number.
    /// `row` is the 1-based spreadsheet row (header = row 1).
    AmountParse {
        table: TableRole,
        row: usize,
        column: String,
        value: String,
    },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { table, column } => {
                write!(f, "{table} table: missing column '{column}'")
            }
            Self::AmountParse { table, row, column, value } => {
                write!(f, "{table} table, row {row}: cannot parse amount '{value}' in column '{column}'")
            }
        }
    }
}

impl std::error::Error for ReconError {}
