//! Invoice-level exports: one line per invoice item with IGST, CGST and SGST
//! already broken out. Returns arrive as negative taxable values.

use std::collections::BTreeMap;

use gstrecon_io::{HeaderLayout, RawTable};

use super::{column_indices, ChannelInput, ChannelNormalizer};
use crate::aggregate::aggregate_records;
use crate::config::{InvoiceChannelConfig, InvoiceColumns, ALL_ACCOUNTS};
use crate::error::ReconError;
use crate::jurisdiction::{clean_label, JurisdictionResolver};
use crate::model::{ChannelSummary, SalesRecord, TaxComponents};
use crate::numeric::{coerce_amount, coerce_quantity};

/// Which seller account's rows to keep.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AccountFilter {
    #[default]
    All,
    Only(String),
}

impl AccountFilter {
    /// `ALL` (any case) or blank means no filtering.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(ALL_ACCOUNTS) {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }

    fn keeps(&self, seller: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(id) => seller.trim() == id,
        }
    }
}

/// Normalized lines plus the key → display name map used when rendering.
#[derive(Debug, Clone, Default)]
pub struct NormalizedSales {
    pub records: Vec<SalesRecord>,
    pub display_names: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct InvoiceLevelNormalizer {
    channel: String,
    columns: InvoiceColumns,
    account: AccountFilter,
    layout: HeaderLayout,
}

impl InvoiceLevelNormalizer {
    pub fn new(channel: &str, columns: InvoiceColumns) -> Self {
        Self {
            channel: channel.to_string(),
            columns,
            account: AccountFilter::All,
            layout: HeaderLayout::HeaderWithAnnotation,
        }
    }

    pub fn from_config(config: &InvoiceChannelConfig) -> Self {
        Self::new(&config.name, config.columns.clone())
            .with_account(AccountFilter::parse(&config.account))
            .with_layout(config.layout)
    }

    pub fn with_account(mut self, account: AccountFilter) -> Self {
        self.account = account;
        self
    }

    pub fn with_layout(mut self, layout: HeaderLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Account selector choices: `ALL` followed by every seller ID seen, sorted.
    pub fn accounts(&self, tables: &[RawTable]) -> Vec<String> {
        let mut ids: Vec<String> = tables.iter().flat_map(|t| t.distinct(&self.columns.seller)).collect();
        ids.sort();
        ids.dedup();
        std::iter::once(ALL_ACCOUNTS.to_string()).chain(ids).collect()
    }

    /// Coerce, sign-correct and key every row of every table (row-wise concatenation).
    pub fn normalize(
        &self,
        tables: &[RawTable],
        resolver: &dyn JurisdictionResolver,
    ) -> Result<NormalizedSales, ReconError> {
        let col = &self.columns;
        let mut out = NormalizedSales::default();

        for table in tables {
            let [value_idx, qty_idx, igst_idx, cgst_idx, sgst_idx, state_idx] = column_indices(
                &self.channel,
                table,
                [
                    col.taxable_value.as_str(),
                    col.quantity.as_str(),
                    col.igst.as_str(),
                    col.cgst.as_str(),
                    col.sgst.as_str(),
                    col.billing_state.as_str(),
                ],
            )?;

            let seller_idx = match (&self.account, table.column_index(&col.seller)) {
                (AccountFilter::All, idx) => idx,
                (AccountFilter::Only(_), Some(idx)) => Some(idx),
                (AccountFilter::Only(_), None) => {
                    return Err(ReconError::missing(&self.channel, table.source(), vec![col.seller.clone()]));
                }
            };

            let before = out.records.len();
            for row in 0..table.len() {
                if let Some(idx) = seller_idx {
                    if !self.account.keeps(table.cell(row, idx)) {
                        continue;
                    }
                }

                let key = clean_label(table.cell(row, state_idx));
                let tax = TaxComponents::new(
                    coerce_amount(table.cell(row, igst_idx)),
                    coerce_amount(table.cell(row, cgst_idx)),
                    coerce_amount(table.cell(row, sgst_idx)),
                );
                let record = SalesRecord::new(
                    key.clone(),
                    coerce_amount(table.cell(row, value_idx)),
                    coerce_quantity(table.cell(row, qty_idx)),
                    tax,
                );

                if !out.display_names.contains_key(&key) {
                    out.display_names.insert(key, resolver.resolve(&record.jurisdiction_raw));
                }
                out.records.push(record);
            }
            log::debug!(
                "{}: {} kept {} of {} rows",
                self.channel,
                table.source(),
                out.records.len() - before,
                table.len()
            );
        }

        Ok(out)
    }
}

impl ChannelNormalizer for InvoiceLevelNormalizer {
    fn channel(&self) -> &str {
        &self.channel
    }

    fn layout(&self) -> HeaderLayout {
        self.layout
    }

    fn summarize(
        &self,
        input: &ChannelInput,
        resolver: &dyn JurisdictionResolver,
    ) -> Result<ChannelSummary, ReconError> {
        let normalized = self.normalize(&input.sales, resolver)?;
        Ok(ChannelSummary {
            channel: self.channel.clone(),
            rows: aggregate_records(&normalized.records, resolver),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jurisdiction::SynonymResolver;

    const HEADERS: [&str; 7] = [
        "Seller GSTIN",
        "Taxable Value (Final Invoice Amount -Taxes)",
        "Item Quantity",
        "IGST Amount",
        "CGST Amount",
        "SGST Amount (Or UTGST as applicable)",
        "Customer's Billing State",
    ];

    fn report(source: &str, rows: &[[&str; 7]]) -> RawTable {
        RawTable::new(
            source,
            &HEADERS,
            rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect(),
        )
    }

    fn normalizer() -> InvoiceLevelNormalizer {
        InvoiceLevelNormalizer::new("flipkart", InvoiceColumns::default())
    }

    #[test]
    fn return_with_positive_quantity_is_negated() {
        let t = report("oct.xlsx", &[["06AAA", "-847.46", "1", "152.54", "0", "0", "Kerala"]]);
        let n = normalizer().normalize(&[t], &SynonymResolver).unwrap();
        assert_eq!(n.records[0].quantity, -1);
        assert_eq!(n.records[0].taxable_value, -847.46);
    }

    #[test]
    fn malformed_numbers_become_zero() {
        let t = report("oct.xlsx", &[["06AAA", "abc", "", "NA", "9", "9", "HARYANA"]]);
        let n = normalizer().normalize(&[t], &SynonymResolver).unwrap();
        let r = &n.records[0];
        assert_eq!(r.taxable_value, 0.0);
        assert_eq!(r.quantity, 0);
        assert_eq!(r.tax, TaxComponents::new(0.0, 9.0, 9.0));
    }

    #[test]
    fn keys_are_cleaned_and_display_names_mapped() {
        let t = report(
            "oct.xlsx",
            &[
                ["06AAA", "100", "1", "18", "0", "0", " orissa "],
                ["06AAA", "100", "1", "18", "0", "0", "ODISHA"],
            ],
        );
        let n = normalizer().normalize(&[t], &SynonymResolver).unwrap();
        assert_eq!(n.records[0].jurisdiction_raw, "ORISSA");
        assert_eq!(n.display_names["ORISSA"], "Odisha");
        assert_eq!(n.display_names["ODISHA"], "Odisha");
    }

    #[test]
    fn multiple_files_concatenate_without_dedup() {
        let row = ["06AAA", "100", "1", "18", "0", "0", "GOA"];
        let a = report("sep.xlsx", &[row]);
        let b = report("oct.xlsx", &[row]);
        let summary = normalizer()
            .summarize(&ChannelInput { sales: vec![a, b], returns: vec![] }, &SynonymResolver)
            .unwrap();
        assert_eq!(summary.rows.len(), 1);
        assert_eq!(summary.rows[0].quantity, 2);
        assert_eq!(summary.rows[0].tax.igst, 36.0);
    }

    #[test]
    fn account_filter_keeps_one_seller() {
        let t = report(
            "oct.xlsx",
            &[
                ["06AAA", "100", "1", "18", "0", "0", "GOA"],
                ["06BBB", "300", "3", "54", "0", "0", "GOA"],
            ],
        );
        let n = normalizer()
            .with_account(AccountFilter::parse("06BBB"))
            .normalize(&[t], &SynonymResolver)
            .unwrap();
        assert_eq!(n.records.len(), 1);
        assert_eq!(n.records[0].quantity, 3);
    }

    #[test]
    fn account_filter_without_seller_column_fails() {
        let t = RawTable::new("oct.csv", &HEADERS[1..], vec![]);
        let err = normalizer()
            .with_account(AccountFilter::Only("06AAA".into()))
            .normalize(&[t.clone()], &SynonymResolver)
            .unwrap_err();
        assert!(err.to_string().contains("'Seller GSTIN'"));

        // Without a filter the seller column is optional.
        assert!(normalizer().normalize(&[t], &SynonymResolver).is_ok());
    }

    #[test]
    fn missing_tax_column_is_fatal() {
        let t = RawTable::new("oct.csv", &["Seller GSTIN", "Item Quantity"], vec![]);
        let err = normalizer().normalize(&[t], &SynonymResolver).unwrap_err();
        match err {
            ReconError::MissingColumn { role, file, columns } => {
                assert_eq!(role, "flipkart");
                assert_eq!(file, "oct.csv");
                assert_eq!(columns.len(), 5);
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn accounts_lists_all_first() {
        let a = report("a.xlsx", &[["06BBB", "1", "1", "0", "0", "0", "GOA"]]);
        let b = report("b.xlsx", &[["06AAA", "1", "1", "0", "0", "0", "GOA"], ["06BBB", "1", "1", "0", "0", "0", "GOA"]]);
        assert_eq!(normalizer().accounts(&[a, b]), vec!["ALL", "06AAA", "06BBB"]);
    }

    #[test]
    fn account_parse() {
        assert_eq!(AccountFilter::parse("all"), AccountFilter::All);
        assert_eq!(AccountFilter::parse(""), AccountFilter::All);
        assert_eq!(AccountFilter::parse(" 06AAA "), AccountFilter::Only("06AAA".into()));
    }
}
