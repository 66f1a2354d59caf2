//! CLI Exit Code Registry
//!
//! Single source of truth for every exit code `logirecon` returns.
//! Scripts and schedulers branch on these, so treat them as a contract.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success, report written                              |
//! | 1    | General error (unspecified)                          |
//! | 2    | Usage error (bad arguments; emitted by clap)         |
//! | 3    | Required input column missing                        |
//! | 4    | Monetary cell is not a number                        |
//! | 5    | Input or config file cannot be read/parsed as table  |
//! | 6    | Config file invalid                                  |
//! | 7    | Report cannot be built or written                    |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant below
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Map it in `recon_exit_code` or at the call site

use logirecon_io::ProcessError;
use logirecon_recon::ReconError;

/// Success - report written.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error. clap exits with this code on bad arguments; also used for
/// argument combinations clap cannot check.
pub const EXIT_USAGE: u8 = 2;

/// A configured column name is absent from an input header row.
pub const EXIT_MISSING_COLUMN: u8 = 3;

/// A cost or net-sales cell holds text that is not an amount.
pub const EXIT_AMOUNT_PARSE: u8 = 4;

/// Input file missing, unreadable, or not a spreadsheet/CSV.
pub const EXIT_INPUT: u8 = 5;

/// Config TOML does not parse or fails validation.
pub const EXIT_INVALID_CONFIG: u8 = 6;

/// Workbook encoding or output file write failed.
pub const EXIT_REPORT_WRITE: u8 = 7;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        ReconError::MissingColumn { .. } => EXIT_MISSING_COLUMN,
        ReconError::AmountParse { .. } => EXIT_AMOUNT_PARSE,
    }
}

/// Map a pipeline error to its exit code.
pub fn process_exit_code(err: &ProcessError) -> u8 {
    match err {
        ProcessError::Load { .. } => EXIT_INPUT,
        ProcessError::Recon(e) => recon_exit_code(e),
        ProcessError::Write(_) => EXIT_REPORT_WRITE,
    }
}
