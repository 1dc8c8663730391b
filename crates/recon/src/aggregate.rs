use std::collections::BTreeMap;

use crate::jurisdiction::{clean_label, JurisdictionResolver};
use crate::model::{SalesRecord, SummaryRow, TaxComponents};
use crate::numeric::round2;

/// Group records by jurisdiction key and sum value, quantity and each tax head.
///
/// Rows come back sorted by key. Sums are not rounded; callers that publish
/// a summary round once at the end.
pub fn aggregate_records(records: &[SalesRecord], resolver: &dyn JurisdictionResolver) -> Vec<SummaryRow> {
    let mut groups: BTreeMap<&str, (f64, i64, TaxComponents)> = BTreeMap::new();

    for record in records {
        let entry = groups
            .entry(record.jurisdiction_raw.as_str())
            .or_insert_with(|| (0.0, 0, TaxComponents::default()));
        entry.0 += record.taxable_value;
        entry.1 = entry.1.saturating_add(record.quantity);
        entry.2 += record.tax;
    }

    groups
        .into_iter()
        .map(|(key, (taxable_value, quantity, tax))| SummaryRow {
            jurisdiction_key: key.to_string(),
            jurisdiction: resolver.resolve(&clean_label(key)),
            taxable_value,
            quantity,
            tax,
        })
        .collect()
}

/// Round every monetary column of a summary to 2 decimals.
pub fn round_rows(rows: &mut [SummaryRow]) {
    for row in rows {
        row.taxable_value = round2(row.taxable_value);
        row.tax = row.tax.rounded();
    }
}
