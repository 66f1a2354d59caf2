//! Results-sheet formatting as data: a list of (range, rule) pairs built up
//! front and applied to the worksheet in one pass.

use rust_xlsxwriter::{
    Color, ConditionalFormatCell, ConditionalFormatCellRule, Format, Worksheet,
};

// Shipment table columns
pub const COL_IDENTIFIER: u16 = 0;
pub const COL_COST: u16 = 1;
pub const COL_RECIPIENT: u16 = 2;
pub const COL_MANAGER: u16 = 3;
pub const COL_SALES: u16 = 4;
pub const COL_RATIO: u16 = 5;

// Summary table columns, relative to the summary start column
pub const SUMMARY_MANAGER: u16 = 0;
pub const SUMMARY_SALES: u16 = 1;
pub const SUMMARY_COST: u16 = 2;
pub const SUMMARY_RATIO: u16 = 3;

const MAX_ROW: u32 = 1_048_575;

pub const AMOUNT_FORMAT: &str = "0.00";
pub const PERCENT_FORMAT: &str = "0.00%";

const AMOUNT_WIDTH: f64 = 18.0;
const RATIO_WIDTH: f64 = 12.0;

/// Inclusive cell rectangle, zero-based.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRange {
    pub first_row: u32,
    pub first_col: u16,
    pub last_row: u32,
    pub last_col: u16,
}

impl CellRange {
    /// Every row of a single column.
    pub fn column(col: u16) -> Self {
        Self { first_row: 0, first_col: col, last_row: MAX_ROW, last_col: col }
    }

    /// Rows `first_row..=last_row` of a single column.
    pub fn column_rows(col: u16, first_row: u32, last_row: u32) -> Self {
        Self { first_row, first_col: col, last_row, last_col: col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumFormat {
    Amount,
    Percent,
}

impl NumFormat {
    pub fn code(self) -> &'static str {
        match self {
            Self::Amount => AMOUNT_FORMAT,
            Self::Percent => PERCENT_FORMAT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Criterion {
    GreaterThan(f64),
    EqualTo(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    /// Column width plus default number format for unformatted cells.
    Column { width: f64, format: NumFormat },
    /// Red font on cells matching the criterion.
    RedText(Criterion),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormatRule {
    pub range: CellRange,
    pub rule: Rule,
}

impl FormatRule {
    fn column(col: u16, width: f64, format: NumFormat) -> Self {
        Self { range: CellRange::column(col), rule: Rule::Column { width, format } }
    }
}

/// Shape of the results sheet the rules are built for.
#[derive(Debug, Clone, Copy)]
pub struct ResultsShape {
    pub shipment_rows: usize,
    pub summary_column: u16,
    pub ratio_alert: f64,
}

/// Formatting rules for the results sheet.
pub fn results_rules(shape: &ResultsShape) -> Vec<FormatRule> {
    let s = shape.summary_column;
    let mut rules = vec![
        FormatRule::column(COL_COST, AMOUNT_WIDTH, NumFormat::Amount),
        FormatRule::column(COL_SALES, AMOUNT_WIDTH, NumFormat::Amount),
        FormatRule::column(COL_RATIO, RATIO_WIDTH, NumFormat::Percent),
        FormatRule::column(s + SUMMARY_SALES, AMOUNT_WIDTH, NumFormat::Amount),
        FormatRule::column(s + SUMMARY_COST, AMOUNT_WIDTH, NumFormat::Amount),
        FormatRule::column(s + SUMMARY_RATIO, RATIO_WIDTH, NumFormat::Percent),
    ];

    // Data rows only: row 0 is the header
    if shape.shipment_rows > 0 {
        let last = shape.shipment_rows as u32;
        rules.push(FormatRule {
            range: CellRange::column_rows(COL_RATIO, 1, last),
            rule: Rule::RedText(Criterion::GreaterThan(shape.ratio_alert)),
        });
        rules.push(FormatRule {
            range: CellRange::column_rows(COL_SALES, 1, last),
            rule: Rule::RedText(Criterion::EqualTo(0.0)),
        });
    }

    rules
}

pub fn apply(worksheet: &mut Worksheet, rules: &[FormatRule]) -> Result<(), String> {
    for rule in rules {
        let r = rule.range;
        match rule.rule {
            Rule::Column { width, format } => {
                let num_format = Format::new().set_num_format(format.code());
                for col in r.first_col..=r.last_col {
                    worksheet
                        .set_column_width(col, width)
                        .map_err(|e| format!("Failed to set column {} width: {}", col, e))?;
                    worksheet
                        .set_column_format(col, &num_format)
                        .map_err(|e| format!("Failed to set column {} format: {}", col, e))?;
                }
            }
            Rule::RedText(criterion) => {
                let red = Format::new().set_font_color(Color::Red);
                let conditional = match criterion {
                    Criterion::GreaterThan(v) => ConditionalFormatCell::new()
                        .set_rule(ConditionalFormatCellRule::GreaterThan(v)),
                    Criterion::EqualTo(v) => ConditionalFormatCell::new()
                        .set_rule(ConditionalFormatCellRule::EqualTo(v)),
                }
                .set_format(red);
                worksheet
                    .add_conditional_format(r.first_row, r.first_col, r.last_row, r.last_col, &conditional)
                    .map_err(|e| format!("Failed to add conditional format: {}", e))?;
            }
        }
    }
    Ok(())
}
