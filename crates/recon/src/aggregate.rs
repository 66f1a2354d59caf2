use std::collections::BTreeMap;

use crate::model::{CleanRecord, ManagerSummary, ShipmentAggregate, SummaryTotals};

/// `cost / sales`, or `None` when sales is zero (or the quotient is not finite).
pub fn logistics_ratio(cost: f64, sales: f64) -> Option<f64> {
    if sales == 0.0 {
        return None;
    }
    let ratio = cost / sales;
    ratio.is_finite().then_some(ratio)
}

/// Round to `places` decimal places, halves to even.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

/// Group clean rows by identifier, summing cost. Recipient, manager and
/// sales come from the first row of each group in input order.
/// Output is sorted by identifier.
pub fn aggregate_shipments(records: &[CleanRecord]) -> Vec<ShipmentAggregate> {
    let mut groups: BTreeMap<&str, (f64, usize, &CleanRecord)> = BTreeMap::new();

    for record in records {
        let entry = groups
            .entry(record.identifier.as_str())
            .or_insert((0.0, 0, record));
        entry.0 += record.surcharged_cost;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(identifier, (cost, line_items, first))| ShipmentAggregate {
            identifier: identifier.to_string(),
            cost,
            recipient: first.recipient.clone(),
            manager: first.manager.clone(),
            net_sales: first.net_sales,
            line_items,
            ratio: logistics_ratio(cost, first.net_sales),
        })
        .collect()
}

/// Regroup shipment aggregates by manager. Output is sorted by manager.
pub fn summarize_managers(shipments: &[ShipmentAggregate]) -> Vec<ManagerSummary> {
    let mut groups: BTreeMap<&str, (f64, f64)> = BTreeMap::new();

    for shipment in shipments {
        let entry = groups.entry(shipment.manager.as_str()).or_insert((0.0, 0.0));
        entry.0 += shipment.net_sales;
        entry.1 += shipment.cost;
    }

    groups
        .into_iter()
        .map(|(manager, (net_sales, cost))| ManagerSummary {
            manager: manager.to_string(),
            net_sales,
            cost,
            ratio: logistics_ratio(cost, net_sales).map(|r| round_to(r, 4)),
        })
        .collect()
}

pub fn summary_totals(managers: &[ManagerSummary]) -> SummaryTotals {
    managers.iter().fold(SummaryTotals::default(), |acc, m| SummaryTotals {
        net_sales: acc.net_sales + m.net_sales,
        cost: acc.cost + m.cost,
    })
}
