//! Column projection, markup, and the left join of shipments onto sales.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::config::{SalesColumns, ShipmentColumns};
use crate::error::ReconError;
use crate::model::{JoinOutput, MergedRecord, SalesRecord, ShipmentRecord};
use crate::table::{Table, TableRole};

fn column(table: &Table, role: TableRole, name: &str) -> Result<usize, ReconError> {
    table.column_index(name).ok_or_else(|| ReconError::MissingColumn {
        table: role,
        column: name.into(),
    })
}

fn amount(
    table: &Table,
    role: TableRole,
    row: usize,
    col: usize,
) -> Result<Option<f64>, ReconError> {
    table.cell(row, col).to_amount().map_err(|value| ReconError::AmountParse {
        table: role,
        // +1 for the header row, +1 for 1-based numbering
        row: row + 2,
        column: table.headers[col].clone(),
        value,
    })
}

/// Project the logistics export and apply the markup to the base cost.
pub fn project_shipments(
    table: &Table,
    columns: &ShipmentColumns,
    markup: f64,
) -> Result<Vec<ShipmentRecord>, ReconError> {
    let role = TableRole::Shipments;
    let id_idx = column(table, role, &columns.identifier)?;
    let cost_idx = column(table, role, &columns.cost)?;
    let recipient_idx = column(table, role, &columns.recipient)?;

    (0..table.len())
        .map(|row| {
            let base_cost = amount(table, role, row, cost_idx)?;
            Ok(ShipmentRecord {
                identifier: table.cell(row, id_idx).to_text(),
                base_cost,
                recipient: table.cell(row, recipient_idx).to_text(),
                surcharged_cost: base_cost.map(|c| c * markup),
            })
        })
        .collect()
}

/// Project the accounting export: document number becomes the identifier,
/// the net amount becomes net sales.
pub fn project_sales(table: &Table, columns: &SalesColumns) -> Result<Vec<SalesRecord>, ReconError> {
    let role = TableRole::Sales;
    let id_idx = column(table, role, &columns.identifier)?;
    let manager_idx = column(table, role, &columns.manager)?;
    let sales_idx = column(table, role, &columns.net_sales)?;

    (0..table.len())
        .map(|row| {
            Ok(SalesRecord {
                identifier: table.cell(row, id_idx).to_text(),
                manager: table.cell(row, manager_idx).to_text(),
                net_sales: amount(table, role, row, sales_idx)?,
            })
        })
        .collect()
}

/// Left join: one merged row per shipment, in shipment order.
///
/// When several sales rows share an identifier, the first one is used and the
/// rest are counted in `duplicate_sales`. A missing identifier never matches.
/// Null manager becomes `unmatched_manager`; null sales become 0.
pub fn left_join(
    shipments: &[ShipmentRecord],
    sales: &[SalesRecord],
    unmatched_manager: &str,
) -> JoinOutput {
    let mut index: HashMap<&str, &SalesRecord> = HashMap::new();
    let mut duplicate_sales = 0;
    for record in sales {
        let Some(ref id) = record.identifier else {
            continue;
        };
        match index.entry(id.as_str()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(_) => duplicate_sales += 1,
        }
    }

    let mut unmatched = 0;
    let merged = shipments
        .iter()
        .map(|shipment| {
            let hit = shipment
                .identifier
                .as_deref()
                .and_then(|id| index.get(id).copied());
            if hit.is_none() {
                unmatched += 1;
            }
            MergedRecord {
                identifier: shipment.identifier.clone(),
                surcharged_cost: shipment.surcharged_cost,
                recipient: shipment.recipient.clone(),
                manager: hit
                    .and_then(|s| s.manager.clone())
                    .unwrap_or_else(|| unmatched_manager.to_string()),
                net_sales: hit.and_then(|s| s.net_sales).unwrap_or(0.0),
                matched: hit.is_some(),
            }
        })
        .collect();

    JoinOutput {
        merged,
        unmatched,
        duplicate_sales,
    }
}
