use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ReconError;

/// Markup applied to the carrier's base price to get the billed cost.
pub const DEFAULT_MARKUP: f64 = 1.3;

/// Manager name used for shipments with no matching sales document.
pub const UNMATCHED_MANAGER: &str = "NEATPAŽINTAS";

/// Excel's hard limit on worksheet name length.
const MAX_SHEET_NAME_LEN: usize = 31;

/// Columns 0..=5 hold the shipment table; the summary must start after them.
const MIN_SUMMARY_COLUMN: u16 = 7;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconConfig {
    pub markup: f64,
    pub unmatched_manager: String,
    pub shipments: ShipmentColumns,
    pub sales: SalesColumns,
    pub report: ReportConfig,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            markup: DEFAULT_MARKUP,
            unmatched_manager: UNMATCHED_MANAGER.to_string(),
            shipments: ShipmentColumns::default(),
            sales: SalesColumns::default(),
            report: ReportConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Headers of the logistics export.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShipmentColumns {
    pub identifier: String,
    pub cost: String,
    pub recipient: String,
}

impl Default for ShipmentColumns {
    fn default() -> Self {
        Self {
            identifier: "Kl.Siuntos Nr.".into(),
            cost: "Kaina, EUR".into(),
            recipient: "Gavėjas".into(),
        }
    }
}

/// Headers of the accounting export.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SalesColumns {
    pub identifier: String,
    pub manager: String,
    pub net_sales: String,
}

impl Default for SalesColumns {
    fn default() -> Self {
        Self {
            identifier: "Dokumento Nr.".into(),
            manager: "Menedžeris".into(),
            net_sales: "Suma Be PVM".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub results_sheet: String,
    pub shipments_sheet: String,
    pub sales_sheet: String,
    /// Zero-based column where the manager summary starts on the results sheet.
    pub summary_column: u16,
    /// Ratios above this are highlighted.
    pub ratio_alert: f64,
    pub labels: ReportLabels,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            results_sheet: "Results".into(),
            shipments_sheet: "Raw table 1".into(),
            sales_sheet: "Raw table 2".into(),
            summary_column: 8,
            ratio_alert: 0.05,
            labels: ReportLabels::default(),
        }
    }
}

/// Headers for computed columns. Projected columns keep their input names.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportLabels {
    pub surcharged_cost: String,
    pub net_sales: String,
    pub ratio: String,
    pub summary_sales: String,
    pub summary_cost: String,
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self {
            surcharged_cost: "Kaina, EUR su priemoka".into(),
            net_sales: "Pardavimas Be PVM".into(),
            ratio: "Logistika %".into(),
            summary_sales: "Pardavimas Be PVM (suma)".into(),
            summary_cost: "Logistikos išlaidos".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ReconError> {
        toml::to_string_pretty(self).map_err(|e| ReconError::ConfigParse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if !self.markup.is_finite() || self.markup <= 0.0 {
            return Err(ReconError::ConfigValidation(format!(
                "markup must be a positive number, got {}",
                self.markup
            )));
        }

        if self.unmatched_manager.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "unmatched_manager must not be blank".into(),
            ));
        }

        let columns = [
            ("shipments.identifier", &self.shipments.identifier),
            ("shipments.cost", &self.shipments.cost),
            ("shipments.recipient", &self.shipments.recipient),
            ("sales.identifier", &self.sales.identifier),
            ("sales.manager", &self.sales.manager),
            ("sales.net_sales", &self.sales.net_sales),
        ];
        for (key, value) in columns {
            if value.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!("{key} must not be empty")));
            }
        }

        let report = &self.report;
        let sheets = [
            ("report.results_sheet", &report.results_sheet),
            ("report.shipments_sheet", &report.shipments_sheet),
            ("report.sales_sheet", &report.sales_sheet),
        ];
        let mut seen = HashSet::new();
        for (key, name) in sheets {
            validate_sheet_name(key, name)?;
            // Excel compares sheet names case-insensitively
            if !seen.insert(name.to_lowercase()) {
                return Err(ReconError::ConfigValidation(format!(
                    "{key}: sheet name '{name}' is used twice"
                )));
            }
        }

        if report.summary_column < MIN_SUMMARY_COLUMN {
            return Err(ReconError::ConfigValidation(format!(
                "report.summary_column must be at least {MIN_SUMMARY_COLUMN}, got {}",
                report.summary_column
            )));
        }

        if !report.ratio_alert.is_finite() {
            return Err(ReconError::ConfigValidation(
                "report.ratio_alert must be a finite number".into(),
            ));
        }

        Ok(())
    }
}

fn validate_sheet_name(key: &str, name: &str) -> Result<(), ReconError> {
    if name.trim().is_empty() {
        return Err(ReconError::ConfigValidation(format!("{key} must not be empty")));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(ReconError::ConfigValidation(format!(
            "{key}: sheet name '{name}' exceeds {MAX_SHEET_NAME_LEN} characters"
        )));
    }
    if let Some(c) = name.chars().find(|c| "[]:*?/\\".contains(*c)) {
        return Err(ReconError::ConfigValidation(format!(
            "{key}: sheet name '{name}' contains '{c}'"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
