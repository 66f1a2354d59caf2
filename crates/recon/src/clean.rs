use crate::model::{CleanOutput, CleanRecord, DropStats, MergedRecord};

fn present(value: &Option<String>) -> Option<&String> {
    value.as_ref().filter(|v| !v.trim().is_empty())
}

/// Keep merged rows whose identifier, cost, recipient and manager are all
/// present and not blank. Net sales is not checked.
///
/// Validation looks at a trimmed copy; survivors keep their original text.
pub fn clean(merged: Vec<MergedRecord>) -> CleanOutput {
    let mut records = Vec::with_capacity(merged.len());
    let mut dropped = DropStats::default();

    for row in merged {
        let Some(identifier) = present(&row.identifier) else {
            dropped.missing_identifier += 1;
            continue;
        };
        let Some(surcharged_cost) = row.surcharged_cost else {
            dropped.missing_cost += 1;
            continue;
        };
        let Some(recipient) = present(&row.recipient) else {
            dropped.missing_recipient += 1;
            continue;
        };
        if row.manager.trim().is_empty() {
            dropped.missing_manager += 1;
            continue;
        }

        records.push(CleanRecord {
            identifier: identifier.clone(),
            surcharged_cost,
            recipient: recipient.clone(),
            manager: row.manager,
            net_sales: row.net_sales,
        });
    }

    dropped.total = dropped.missing_identifier
        + dropped.missing_cost
        + dropped.missing_recipient
        + dropped.missing_manager;

    CleanOutput { records, dropped }
}
