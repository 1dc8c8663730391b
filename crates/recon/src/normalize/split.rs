//! Sales-minus-returns exports: separate sales and returns files, each with a
//! single combined tax column that has to be split into GST heads by place of
//! supply.

use gstrecon_io::{HeaderLayout, RawTable};

use super::{column_indices, ChannelInput, ChannelNormalizer};
use crate::aggregate::{aggregate_records, round_rows};
use crate::config::{SplitChannelConfig, SplitColumns};
use crate::error::ReconError;
use crate::jurisdiction::{clean_label, JurisdictionResolver};
use crate::model::{ChannelSummary, SalesRecord, TaxComponents};
use crate::numeric::{coerce_amount, coerce_quantity};

#[derive(Debug, Clone)]
pub struct SalesReturnsNormalizer {
    channel: String,
    columns: SplitColumns,
    /// Cleaned home jurisdiction label; rows shipped there are intra-state.
    home: String,
    layout: HeaderLayout,
}

impl SalesReturnsNormalizer {
    pub fn new(channel: &str, columns: SplitColumns, home_jurisdiction: &str) -> Self {
        Self {
            channel: channel.to_string(),
            columns,
            home: clean_label(home_jurisdiction),
            layout: HeaderLayout::SingleHeader,
        }
    }

    pub fn from_config(config: &SplitChannelConfig, home_jurisdiction: &str) -> Self {
        Self::new(&config.name, config.columns.clone(), home_jurisdiction).with_layout(config.layout)
    }

    pub fn with_layout(mut self, layout: HeaderLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Sales rows as-is followed by every returns row reversed, with tax split applied.
    ///
    /// Records keep the state label exactly as the export spelled it.
    pub fn records(&self, input: &ChannelInput) -> Result<Vec<SalesRecord>, ReconError> {
        if input.sales.is_empty() {
            return Err(ReconError::NoValidInput { role: format!("{}/sales", self.channel) });
        }

        let sales_role = format!("{}/sales", self.channel);
        let returns_role = format!("{}/returns", self.channel);

        // Validate every file before reading any rows.
        for table in &input.sales {
            self.indices(&sales_role, table)?;
        }
        for table in &input.returns {
            self.indices(&returns_role, table)?;
        }

        let mut records = Vec::new();
        for table in &input.sales {
            self.read_rows(&sales_role, table, &mut records, false)?;
        }
        for table in &input.returns {
            self.read_rows(&returns_role, table, &mut records, true)?;
        }
        Ok(records)
    }

    fn indices(&self, role: &str, table: &RawTable) -> Result<[usize; 4], ReconError> {
        let col = &self.columns;
        column_indices(
            role,
            table,
            [
                col.quantity.as_str(),
                col.taxable_value.as_str(),
                col.tax_amount.as_str(),
                col.state.as_str(),
            ],
        )
    }

    fn read_rows(
        &self,
        role: &str,
        table: &RawTable,
        out: &mut Vec<SalesRecord>,
        is_return: bool,
    ) -> Result<(), ReconError> {
        let [qty_idx, value_idx, tax_idx, state_idx] = self.indices(role, table)?;

        for row in 0..table.len() {
            let label = table.cell(row, state_idx);
            let intra_state = clean_label(label) == self.home;
            let record = SalesRecord::new(
                label.to_string(),
                coerce_amount(table.cell(row, value_idx)),
                coerce_quantity(table.cell(row, qty_idx)),
                TaxComponents::split(coerce_amount(table.cell(row, tax_idx)), intra_state),
            );
            out.push(if is_return { record.reversed() } else { record });
        }

        log::debug!("{role}: {} rows from {}", table.len(), table.source());
        Ok(())
    }
}

impl ChannelNormalizer for SalesReturnsNormalizer {
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
        let records = self.records(input)?;
        let mut rows = aggregate_records(&records, resolver);
        round_rows(&mut rows);
        Ok(ChannelSummary { channel: self.channel.clone(), rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jurisdiction::SynonymResolver;

    const HEADERS: [&str; 4] = ["quantity", "total_taxable_sale_value", "tax_amount", "end_customer_state_new"];

    fn export(source: &str, rows: &[[&str; 4]]) -> RawTable {
        RawTable::new(
            source,
            &HEADERS,
            rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect(),
        )
    }

    fn normalizer() -> SalesReturnsNormalizer {
        SalesReturnsNormalizer::new("meesho", SplitColumns::default(), "Haryana")
    }

    fn summarize(sales: Vec<RawTable>, returns: Vec<RawTable>) -> ChannelSummary {
        normalizer()
            .summarize(&ChannelInput { sales, returns }, &SynonymResolver)
            .unwrap()
    }

    #[test]
    fn home_state_splits_into_halves() {
        let s = summarize(
            vec![export("sales.csv", &[["2", "1000", "100", "HARYANA"], ["1", "500", "100", "DELHI"]])],
            vec![],
        );
        let haryana = s.row("HARYANA").unwrap();
        assert_eq!(haryana.tax, TaxComponents::new(0.0, 50.0, 50.0));
        assert_eq!(haryana.quantity, 2);
        assert_eq!(haryana.taxable_value, 1000.0);

        let delhi = s.row("DELHI").unwrap();
        assert_eq!(delhi.tax, TaxComponents::new(100.0, 0.0, 0.0));
        assert_eq!(delhi.jurisdiction, "Delhi");
    }

    #[test]
    fn absurd_quantity_cells_do_not_overflow_totals() {
        let s = summarize(
            vec![export("sales.csv", &[["1e19", "100", "18", "GOA"], ["1e19", "100", "18", "GOA"], ["3", "50", "9", "GOA"]])],
            vec![],
        );
        let goa = s.row("GOA").unwrap();
        assert_eq!(goa.quantity, 3);
        assert_eq!(goa.taxable_value, 250.0);
        assert_eq!(goa.tax.igst, 45.0);
    }

    #[test]
    fn home_match_ignores_case_and_spacing() {
        let s = summarize(vec![export("sales.csv", &[["1", "100", "18", " haryana "]])], vec![]);
        let row = s.row(" haryana ").unwrap();
        assert_eq!(row.tax.cgst, 9.0);
        assert_eq!(row.jurisdiction, "Haryana");
    }

    #[test]
    fn identical_return_cancels_sale() {
        let row = ["3", "1499.97", "74.99", "Kerala"];
        let s = summarize(vec![export("sales.csv", &[row])], vec![export("returns.csv", &[row])]);
        let kerala = s.row("Kerala").unwrap();
        assert_eq!(kerala.quantity, 0);
        assert_eq!(kerala.taxable_value, 0.0);
        assert_eq!(kerala.tax.igst, 0.0);
    }

    #[test]
    fn returns_subtract() {
        let s = summarize(
            vec![export("sales.csv", &[["5", "5000", "250", "Goa"]])],
            vec![export("returns.csv", &[["1", "1000", "50", "Goa"]])],
        );
        let goa = s.row("Goa").unwrap();
        assert_eq!(goa.quantity, 4);
        assert_eq!(goa.taxable_value, 4000.0);
        assert_eq!(goa.tax.igst, 200.0);
    }

    #[test]
    fn sums_are_rounded_to_two_decimals() {
        let s = summarize(
            vec![export("sales.csv", &[["1", "10.004", "0.015", "HARYANA"], ["1", "10.004", "0.01", "HARYANA"]])],
            vec![],
        );
        let row = s.row("HARYANA").unwrap();
        assert_eq!(row.taxable_value, 20.01);
        assert_eq!(row.tax.cgst, 0.01);
    }

    #[test]
    fn labels_are_not_canonicalized_in_keys() {
        let s = summarize(vec![export("sales.csv", &[["1", "1", "0", "Orissa"], ["1", "1", "0", "ODISHA"]])], vec![]);
        assert_eq!(s.rows.len(), 2);
        assert!(s.row("Orissa").is_some());
    }

    #[test]
    fn missing_column_in_returns_is_fatal() {
        let bad = RawTable::new("returns.xlsx", &["quantity", "tax_amount"], vec![]);
        let err = normalizer()
            .summarize(
                &ChannelInput { sales: vec![export("sales.csv", &[])], returns: vec![bad] },
                &SynonymResolver,
            )
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "meesho/returns: returns.xlsx: missing column(s) 'total_taxable_sale_value', 'end_customer_state_new'"
        );
    }

    #[test]
    fn no_sales_files_is_no_valid_input() {
        let err = normalizer().summarize(&ChannelInput::default(), &SynonymResolver).unwrap_err();
        assert!(matches!(err, ReconError::NoValidInput { .. }));
    }
}
