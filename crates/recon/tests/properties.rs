// Property-based tests for normalization, resolution, aggregation and merge.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;

use gstrecon_io::RawTable;
use gstrecon_recon::aggregate::{aggregate_records, round_rows};
use gstrecon_recon::config::InvoiceColumns;
use gstrecon_recon::jurisdiction::canonical_names;
use gstrecon_recon::numeric::round2;
use gstrecon_recon::{
    merge, resolve, ChannelSummary, InvoiceLevelNormalizer, SalesRecord, SynonymResolver, TaxComponents,
    TruncatingResolver, JurisdictionResolver,
};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

const LABELS: &[&str] = &[
    "HARYANA", "haryana ", "DELHI", "NEW DELHI", "ORISSA", "ODISHA", "TAMILNADU", "TAMIL NADU", "GOA", "MYSORE", "",
];

fn amount() -> impl Strategy<Value = f64> {
    (-10_000_000i64..10_000_000).prop_map(|cents| cents as f64 / 100.0)
}

fn record() -> impl Strategy<Value = SalesRecord> {
    (proptest::sample::select(LABELS), amount(), -50i64..50, amount(), amount(), amount()).prop_map(
        |(label, value, qty, igst, cgst, sgst)| {
            SalesRecord::new(label.trim().to_uppercase(), value, qty, TaxComponents::new(igst, cgst, sgst))
        },
    )
}

fn channel(name: &'static str) -> impl Strategy<Value = ChannelSummary> {
    proptest::collection::vec(record(), 0..30).prop_map(move |records| {
        let mut rows = aggregate_records(&records, &SynonymResolver);
        round_rows(&mut rows);
        ChannelSummary { channel: name.to_string(), rows }
    })
}

const MONEY_COLUMNS: [&str; 4] = ["taxable_value", "igst", "cgst", "sgst"];

struct ColumnSums {
    money: [f64; 4],
    quantity: i64,
}

fn column_sums(rows: impl Iterator<Item = (f64, i64, TaxComponents)>) -> ColumnSums {
    let mut sums = ColumnSums { money: [0.0; 4], quantity: 0 };
    for (value, quantity, tax) in rows {
        sums.money[0] += value;
        sums.money[1] += tax.igst;
        sums.money[2] += tax.cgst;
        sums.money[3] += tax.sgst;
        sums.quantity += quantity;
    }
    sums
}

// ---------------------------------------------------------------------------
// Sign invariant
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn negative_value_never_has_positive_quantity(value in amount(), qty in -1000i64..1000) {
        let record = SalesRecord::new("GOA".into(), value, qty, TaxComponents::default());
        if value < 0.0 {
            prop_assert!(record.quantity <= 0);
            prop_assert_eq!(record.quantity, -qty.abs());
        } else {
            prop_assert_eq!(record.quantity, qty);
        }
    }

    #[test]
    fn normalized_invoice_rows_keep_sign_invariant(
        rows in proptest::collection::vec((amount(), -20i64..20, proptest::sample::select(LABELS)), 1..40)
    ) {
        let columns = InvoiceColumns::default();
        let headers = [
            columns.taxable_value.as_str(),
            columns.quantity.as_str(),
            columns.igst.as_str(),
            columns.cgst.as_str(),
            columns.sgst.as_str(),
            columns.billing_state.as_str(),
        ];
        let cells = rows
            .iter()
            .map(|(value, qty, label)| {
                vec![value.to_string(), qty.to_string(), "0".into(), "0".into(), "0".into(), label.to_string()]
            })
            .collect();
        let table = RawTable::new("export.csv", &headers, cells);

        let normalized = InvoiceLevelNormalizer::new("flipkart", columns.clone())
            .normalize(&[table], &SynonymResolver)
            .unwrap();
        prop_assert_eq!(normalized.records.len(), rows.len());
        for (record, (value, qty, _)) in normalized.records.iter().zip(&rows) {
            if *value < 0.0 {
                prop_assert!(record.quantity <= 0);
            } else {
                prop_assert_eq!(record.quantity, *qty);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn resolve_is_total(label in "\\PC*") {
        prop_assert!(!resolve(&label).is_empty());
        prop_assert!(!TruncatingResolver::default().resolve(&label).is_empty());
    }

    #[test]
    fn canonical_names_are_fixed_points(name in proptest::sample::select(canonical_names())) {
        prop_assert_eq!(resolve(&name.to_uppercase()), name);
    }
}

// ---------------------------------------------------------------------------
// Aggregation and merge
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn aggregation_conserves_totals(records in proptest::collection::vec(record(), 0..60)) {
        let mut rows = aggregate_records(&records, &SynonymResolver);
        round_rows(&mut rows);

        let input = column_sums(records.iter().map(|r| (r.taxable_value, r.quantity, r.tax)));
        let output = column_sums(rows.iter().map(|r| (r.taxable_value, r.quantity, r.tax)));
        let tolerance = 0.01 * (rows.len() + 1) as f64;

        for (column, (i, o)) in MONEY_COLUMNS.iter().zip(input.money.iter().zip(&output.money)) {
            prop_assert!((i - o).abs() <= tolerance, "{}: {} vs {}", column, i, o);
        }
        prop_assert_eq!(input.quantity, output.quantity);
    }

    #[test]
    fn merge_conserves_totals(a in channel("flipkart"), b in channel("meesho")) {
        let merged = merge([&a, &b]);

        let input = column_sums(a.rows.iter().chain(&b.rows).map(|r| (r.taxable_value, r.quantity, r.tax)));
        let output = column_sums(merged.rows.iter().map(|r| (r.taxable_value, r.quantity, r.tax)));
        let tolerance = 0.01 * (merged.rows.len() + 1) as f64;

        for (column, (i, o)) in MONEY_COLUMNS.iter().zip(input.money.iter().zip(&output.money)) {
            prop_assert!((i - o).abs() <= tolerance, "{}: {} vs {}", column, i, o);
        }
        prop_assert_eq!(input.quantity, output.quantity);
    }

    #[test]
    fn merge_is_repeatable_and_rounding_stable(a in channel("flipkart"), b in channel("meesho")) {
        let first = merge([&a, &b]);
        let second = merge([&a, &b]);
        prop_assert_eq!(&first, &second);

        for row in &first.rows {
            prop_assert_eq!(round2(row.taxable_value), row.taxable_value);
            prop_assert_eq!(row.tax.rounded(), row.tax);
        }
    }
}
