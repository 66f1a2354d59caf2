use crate::aggregate::{aggregate_shipments, summarize_managers, summary_totals};
use crate::clean::clean;
use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::model::{ReconMeta, ReconResult, RunStats};
use crate::reconcile::{left_join, project_sales, project_shipments};
use crate::table::Table;

/// Run the full reconciliation: project, join, clean, aggregate.
///
/// `shipments` and `sales` must be in source row order; "first value in
/// group" during aggregation depends on it.
pub fn run(config: &ReconConfig, shipments: &Table, sales: &Table) -> Result<ReconResult, ReconError> {
    let shipment_records = project_shipments(shipments, &config.shipments, config.markup)?;
    let sales_records = project_sales(sales, &config.sales)?;
    log::debug!(
        "projected {} shipment rows, {} sales rows",
        shipment_records.len(),
        sales_records.len()
    );

    let joined = left_join(&shipment_records, &sales_records, &config.unmatched_manager);
    if joined.unmatched > 0 {
        log::warn!(
            "{} shipment row(s) have no sales document; manager set to '{}'",
            joined.unmatched,
            config.unmatched_manager
        );
    }
    if joined.duplicate_sales > 0 {
        log::warn!(
            "{} sales row(s) repeat an earlier document number and were ignored",
            joined.duplicate_sales
        );
    }

    let merged_rows = joined.merged.len();
    let cleaned = clean(joined.merged);
    if cleaned.dropped.total > 0 {
        log::warn!(
            "dropped {} incomplete row(s): {} without identifier, {} without cost, {} without recipient, {} without manager",
            cleaned.dropped.total,
            cleaned.dropped.missing_identifier,
            cleaned.dropped.missing_cost,
            cleaned.dropped.missing_recipient,
            cleaned.dropped.missing_manager,
        );
    }

    let aggregates = aggregate_shipments(&cleaned.records);
    let managers = summarize_managers(&aggregates);
    let totals = summary_totals(&managers);
    log::debug!(
        "aggregated {} clean rows into {} shipments, {} managers",
        cleaned.records.len(),
        aggregates.len(),
        managers.len()
    );

    let stats = RunStats {
        shipment_rows: shipment_records.len(),
        sales_rows: sales_records.len(),
        merged_rows,
        unmatched_shipments: joined.unmatched,
        duplicate_sales: joined.duplicate_sales,
        clean_rows: cleaned.records.len(),
        dropped: cleaned.dropped,
        shipments: aggregates.len(),
        managers: managers.len(),
    };

    Ok(ReconResult {
        meta: ReconMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            markup: config.markup,
        },
        stats,
        shipments: aggregates,
        managers,
        totals,
    })
}
