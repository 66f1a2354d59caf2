use serde::Serialize;

// ---------------------------------------------------------------------------
// Projected input
// ---------------------------------------------------------------------------

/// One row of the logistics export, projected to the columns we use.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentRecord {
    pub identifier: Option<String>,
    pub base_cost: Option<f64>,
    pub recipient: Option<String>,
    /// `base_cost * markup`, computed at projection time.
    pub surcharged_cost: Option<f64>,
}

/// One row of the accounting export, projected and renamed.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub identifier: Option<String>,
    pub manager: Option<String>,
    /// Sales net of tax.
    pub net_sales: Option<f64>,
}

// ---------------------------------------------------------------------------
// Join + clean
// ---------------------------------------------------------------------------

/// A shipment with its sales document attached (or defaults filled in).
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRecord {
    pub identifier: Option<String>,
    pub surcharged_cost: Option<f64>,
    pub recipient: Option<String>,
    pub manager: String,
    pub net_sales: f64,
    /// Whether a sales document with this identifier existed.
    pub matched: bool,
}

#[derive(Debug, Default)]
pub struct JoinOutput {
    pub merged: Vec<MergedRecord>,
    pub unmatched: usize,
    /// Sales rows ignored because an earlier row had the same identifier.
    pub duplicate_sales: usize,
}

/// A merged row with every required field present and non-blank.
/// Values are kept exactly as loaded (not trimmed).
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    pub identifier: String,
    pub surcharged_cost: f64,
    pub recipient: String,
    pub manager: String,
    pub net_sales: f64,
}

/// Rows removed by the cleaner, keyed by the first required field that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DropStats {
    pub total: usize,
    pub missing_identifier: usize,
    pub missing_cost: usize,
    pub missing_recipient: usize,
    pub missing_manager: usize,
}

#[derive(Debug, Default)]
pub struct CleanOutput {
    pub records: Vec<CleanRecord>,
    pub dropped: DropStats,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// All clean lines of one shipment folded together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentAggregate {
    pub identifier: String,
    /// Sum of surcharged costs over every line of the shipment.
    pub cost: f64,
    pub recipient: String,
    pub manager: String,
    pub net_sales: f64,
    pub line_items: usize,
    /// `cost / net_sales`; `None` when net sales is zero.
    pub ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManagerSummary {
    pub manager: String,
    pub net_sales: f64,
    pub cost: f64,
    /// `cost / net_sales` rounded to 4 places; `None` when sales total zero.
    pub ratio: Option<f64>,
}

/// Column sums of the manager summary. A ratio of sums is not reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryTotals {
    pub net_sales: f64,
    pub cost: f64,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub shipment_rows: usize,
    pub sales_rows: usize,
    pub merged_rows: usize,
    pub unmatched_shipments: usize,
    pub duplicate_sales: usize,
    pub clean_rows: usize,
    pub dropped: DropStats,
    pub shipments: usize,
    pub managers: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub engine_version: String,
    pub run_at: String,
    pub markup: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub stats: RunStats,
    pub shipments: Vec<ShipmentAggregate>,
    pub managers: Vec<ManagerSummary>,
    pub totals: SummaryTotals,
}
