//! CSV exports: UTF-8, comma-delimited, header row first, currency to 2 decimals.

use std::io::Write;

use crate::error::ReconError;
use crate::model::{ChannelSummary, ConsolidatedSummary, TaxComponents};
use crate::picklist::MasterSkuTotal;

pub const CHANNEL_HEADER: [&str; 7] = [
    "Jurisdiction",
    "Source Label",
    "Taxable Value",
    "Quantity",
    "IGST",
    "CGST",
    "SGST",
];

pub const CONSOLIDATED_HEADER: [&str; 7] = [
    "Jurisdiction",
    "Taxable Value",
    "Quantity",
    "IGST",
    "CGST",
    "SGST",
    "Channels",
];

pub const PICKLIST_HEADER: [&str; 2] = ["Master SKU", "Total Quantity"];

/// Fixed 2-decimal rendering; never prints "-0.00".
pub fn format_amount(value: f64) -> String {
    let s = format!("{value:.2}");
    if s == "-0.00" {
        "0.00".into()
    } else {
        s
    }
}

fn tax_fields(tax: &TaxComponents) -> [String; 3] {
    [format_amount(tax.igst), format_amount(tax.cgst), format_amount(tax.sgst)]
}

fn writer<W: Write>(out: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out)
}

fn write_err(e: impl std::fmt::Display) -> ReconError {
    ReconError::Io(format!("CSV write error: {e}"))
}

pub fn write_channel_csv(summary: &ChannelSummary, out: impl Write) -> Result<(), ReconError> {
    let mut csv = writer(out);
    csv.write_record(CHANNEL_HEADER).map_err(write_err)?;

    for row in &summary.rows {
        let [igst, cgst, sgst] = tax_fields(&row.tax);
        csv.write_record([
            row.jurisdiction.clone(),
            row.jurisdiction_key.clone(),
            format_amount(row.taxable_value),
            row.quantity.to_string(),
            igst,
            cgst,
            sgst,
        ])
        .map_err(write_err)?;
    }

    csv.flush().map_err(write_err)
}

pub fn write_consolidated_csv(summary: &ConsolidatedSummary, out: impl Write) -> Result<(), ReconError> {
    let mut csv = writer(out);
    csv.write_record(CONSOLIDATED_HEADER).map_err(write_err)?;

    for row in &summary.rows {
        let [igst, cgst, sgst] = tax_fields(&row.tax);
        csv.write_record([
            row.jurisdiction.clone(),
            format_amount(row.taxable_value),
            row.quantity.to_string(),
            igst,
            cgst,
            sgst,
            row.channels.join(";"),
        ])
        .map_err(write_err)?;
    }

    csv.flush().map_err(write_err)
}

pub fn write_picklist_csv(totals: &[MasterSkuTotal], out: impl Write) -> Result<(), ReconError> {
    let mut csv = writer(out);
    csv.write_record(PICKLIST_HEADER).map_err(write_err)?;

    for total in totals {
        csv.write_record([total.master_sku.clone(), total.quantity.to_string()])
            .map_err(write_err)?;
    }

    csv.flush().map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConsolidatedRow, SummaryRow};

    #[test]
    fn amounts_have_two_decimals() {
        assert_eq!(format_amount(1500.0), "1500.00");
        assert_eq!(format_amount(-12.5), "-12.50");
        assert_eq!(format_amount(-0.001), "0.00");
    }

    #[test]
    fn channel_csv_layout() {
        let summary = ChannelSummary {
            channel: "meesho".into(),
            rows: vec![SummaryRow {
                jurisdiction_key: "Tamilnadu".into(),
                jurisdiction: "Tamil Nadu".into(),
                taxable_value: 999.5,
                quantity: -2,
                tax: TaxComponents::new(49.5, 0.0, 0.0),
            }],
        };
        let mut buf = Vec::new();
        write_channel_csv(&summary, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Jurisdiction,Source Label,Taxable Value,Quantity,IGST,CGST,SGST\n\
             Tamil Nadu,Tamilnadu,999.50,-2,49.50,0.00,0.00\n"
        );
    }

    #[test]
    fn consolidated_csv_quotes_names_with_commas() {
        let summary = ConsolidatedSummary {
            rows: vec![ConsolidatedRow {
                jurisdiction: "Dadra, Nagar Haveli".into(),
                channels: vec!["flipkart".into(), "meesho".into()],
                taxable_value: 10.0,
                quantity: 1,
                tax: TaxComponents::new(0.0, 0.9, 0.9),
            }],
        };
        let mut buf = Vec::new();
        write_consolidated_csv(&summary, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("\"Dadra, Nagar Haveli\",10.00,1,0.00,0.90,0.90,flipkart;meesho\n"));
    }

    #[test]
    fn picklist_csv_layout() {
        let totals = vec![
            MasterSkuTotal { master_sku: "MUG".into(), quantity: 9 },
            MasterSkuTotal { master_sku: "UNMAPPED_ITEM".into(), quantity: 4 },
        ];
        let mut buf = Vec::new();
        write_picklist_csv(&totals, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Master SKU,Total Quantity\nMUG,9\nUNMAPPED_ITEM,4\n"
        );
    }
}
