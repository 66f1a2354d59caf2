// Result workbook export

use std::fmt;

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use logirecon_recon::{Cell, ReconConfig, ReconError, ReconResult, Table, TableRole};

use crate::layout::{self, ResultsShape};
use crate::xlsx;

const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Finished report: the encoded workbook plus the figures it was built from.
#[derive(Debug)]
pub struct ReportOutput {
    pub workbook: Vec<u8>,
    pub result: ReconResult,
}

#[derive(Debug)]
pub enum ProcessError {
    /// An input document could not be read as a table.
    Load { table: TableRole, message: String },
    /// Config rejected or input columns unusable.
    Recon(ReconError),
    /// Workbook serialization failed.
    Write(String),
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { table, message } => write!(f, "cannot load {table} file: {message}"),
            Self::Recon(e) => write!(f, "{e}"),
            Self::Write(msg) => write!(f, "cannot write report: {msg}"),
        }
    }
}

impl std::error::Error for ProcessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Recon(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ReconError> for ProcessError {
    fn from(e: ReconError) -> Self {
        Self::Recon(e)
    }
}

/// Full pipeline over two in-memory spreadsheet documents.
pub fn process(shipments: &[u8], sales: &[u8], config: &ReconConfig) -> Result<ReportOutput, ProcessError> {
    let shipments = xlsx::load_first_sheet(shipments)
        .map_err(|message| ProcessError::Load { table: TableRole::Shipments, message })?;
    let sales = xlsx::load_first_sheet(sales)
        .map_err(|message| ProcessError::Load { table: TableRole::Sales, message })?;
    build_report(&shipments, &sales, config)
}

/// Reconcile two loaded tables and render the result workbook.
pub fn build_report(shipments: &Table, sales: &Table, config: &ReconConfig) -> Result<ReportOutput, ProcessError> {
    config.validate()?;
    let result = logirecon_recon::run(config, shipments, sales)?;
    let workbook = write_workbook(&result, shipments, sales, config).map_err(ProcessError::Write)?;
    log::debug!("report workbook: {} bytes", workbook.len());
    Ok(ReportOutput { workbook, result })
}

/// Results sheet first, then both inputs verbatim.
pub fn write_workbook(
    result: &ReconResult,
    shipments: &Table,
    sales: &Table,
    config: &ReconConfig,
) -> Result<Vec<u8>, String> {
    let report = &config.report;
    let mut workbook = Workbook::new();

    let worksheet = workbook
        .add_worksheet()
        .set_name(&report.results_sheet)
        .map_err(|e| format!("Invalid sheet name '{}': {}", report.results_sheet, e))?;
    write_results(worksheet, result, config)?;

    let worksheet = workbook
        .add_worksheet()
        .set_name(&report.shipments_sheet)
        .map_err(|e| format!("Invalid sheet name '{}': {}", report.shipments_sheet, e))?;
    write_raw(worksheet, shipments)?;

    let worksheet = workbook
        .add_worksheet()
        .set_name(&report.sales_sheet)
        .map_err(|e| format!("Invalid sheet name '{}': {}", report.sales_sheet, e))?;
    write_raw(worksheet, sales)?;

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Failed to encode workbook: {}", e))
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
}

fn write_err(row: u32, col: u16, e: impl fmt::Display) -> String {
    format!("Failed to write cell ({}, {}): {}", row, col, e)
}

fn cell_err(row: u32, col: u16) -> impl Fn(XlsxError) -> String {
    move |e| write_err(row, col, e)
}

fn write_headers(worksheet: &mut Worksheet, first_col: u16, headers: &[&str]) -> Result<(), String> {
    let format = header_format();
    for (i, header) in headers.iter().enumerate() {
        let col = first_col + i as u16;
        worksheet
            .write_string_with_format(0, col, *header, &format)
            .map_err(|e| write_err(0, col, e))?;
    }
    Ok(())
}

fn write_results(worksheet: &mut Worksheet, result: &ReconResult, config: &ReconConfig) -> Result<(), String> {
    let labels = &config.report.labels;
    let s = config.report.summary_column;

    write_headers(
        worksheet,
        0,
        &[
            config.shipments.identifier.as_str(),
            labels.surcharged_cost.as_str(),
            config.shipments.recipient.as_str(),
            config.sales.manager.as_str(),
            labels.net_sales.as_str(),
            labels.ratio.as_str(),
        ],
    )?;

    for (i, shipment) in result.shipments.iter().enumerate() {
        let row = i as u32 + 1;
        let err = |col| cell_err(row, col);
        worksheet
            .write_string(row, layout::COL_IDENTIFIER, &shipment.identifier)
            .map_err(err(layout::COL_IDENTIFIER))?;
        worksheet
            .write_number(row, layout::COL_COST, shipment.cost)
            .map_err(err(layout::COL_COST))?;
        worksheet
            .write_string(row, layout::COL_RECIPIENT, &shipment.recipient)
            .map_err(err(layout::COL_RECIPIENT))?;
        worksheet
            .write_string(row, layout::COL_MANAGER, &shipment.manager)
            .map_err(err(layout::COL_MANAGER))?;
        worksheet
            .write_number(row, layout::COL_SALES, shipment.net_sales)
            .map_err(err(layout::COL_SALES))?;
        // Undefined ratio stays blank
        if let Some(ratio) = shipment.ratio {
            worksheet
                .write_number(row, layout::COL_RATIO, ratio)
                .map_err(err(layout::COL_RATIO))?;
        }
    }

    write_headers(
        worksheet,
        s,
        &[
            config.sales.manager.as_str(),
            labels.summary_sales.as_str(),
            labels.summary_cost.as_str(),
            labels.ratio.as_str(),
        ],
    )?;

    for (i, summary) in result.managers.iter().enumerate() {
        let row = i as u32 + 1;
        let err = |col| cell_err(row, col);
        let col = s + layout::SUMMARY_MANAGER;
        worksheet.write_string(row, col, &summary.manager).map_err(err(col))?;
        let col = s + layout::SUMMARY_SALES;
        worksheet.write_number(row, col, summary.net_sales).map_err(err(col))?;
        let col = s + layout::SUMMARY_COST;
        worksheet.write_number(row, col, summary.cost).map_err(err(col))?;
        if let Some(ratio) = summary.ratio {
            let col = s + layout::SUMMARY_RATIO;
            worksheet.write_number(row, col, ratio).map_err(err(col))?;
        }
    }

    // Totals row directly below the last manager; ratio column left empty
    let totals_row = result.managers.len() as u32 + 1;
    let bold = Format::new().set_bold().set_num_format(layout::AMOUNT_FORMAT);
    let col = s + layout::SUMMARY_SALES;
    worksheet
        .write_number_with_format(totals_row, col, result.totals.net_sales, &bold)
        .map_err(|e| write_err(totals_row, col, e))?;
    let col = s + layout::SUMMARY_COST;
    worksheet
        .write_number_with_format(totals_row, col, result.totals.cost, &bold)
        .map_err(|e| write_err(totals_row, col, e))?;

    let rules = layout::results_rules(&ResultsShape {
        shipment_rows: result.shipments.len(),
        summary_column: s,
        ratio_alert: config.report.ratio_alert,
    });
    layout::apply(worksheet, &rules)
}

/// Dump a loaded table unchanged: header row, then every data row.
fn write_raw(worksheet: &mut Worksheet, table: &Table) -> Result<(), String> {
    let headers: Vec<&str> = table.headers.iter().map(String::as_str).collect();
    write_headers(worksheet, 0, &headers)?;

    let datetime = Format::new().set_num_format(DATETIME_FORMAT);
    for (i, cells) in table.rows.iter().enumerate() {
        let row = i as u32 + 1;
        for (j, cell) in cells.iter().enumerate() {
            let col = j as u16;
            let written = match cell {
                Cell::Empty => continue,
                Cell::Text(s) | Cell::Error(s) => worksheet.write_string(row, col, s),
                Cell::Number(n) if n.is_finite() => worksheet.write_number(row, col, *n),
                Cell::Number(n) => worksheet.write_string(row, col, n.to_string()),
                Cell::Int(n) => worksheet.write_number(row, col, *n as f64),
                Cell::Bool(b) => worksheet.write_boolean(row, col, *b),
                Cell::DateTime(serial) => worksheet.write_number_with_format(row, col, *serial, &datetime),
            };
            written.map_err(|e| write_err(row, col, e))?;
        }
    }
    Ok(())
}
