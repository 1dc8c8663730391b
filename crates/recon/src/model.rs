use std::ops::AddAssign;

use serde::Serialize;

use crate::numeric::round2;

// ---------------------------------------------------------------------------
// Tax components
// ---------------------------------------------------------------------------

/// The three GST heads: inter-state (IGST) and the two intra-state halves (CGST, SGST).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TaxComponents {
    pub igst: f64,
    pub cgst: f64,
    pub sgst: f64,
}

impl TaxComponents {
    pub fn new(igst: f64, cgst: f64, sgst: f64) -> Self {
        Self { igst, cgst, sgst }
    }

    /// A single combined tax amount split by place of supply: intra-state
    /// sales carry two equal halves, everything else carries one IGST amount.
    pub fn split(tax_amount: f64, intra_state: bool) -> Self {
        if intra_state {
            let half = tax_amount / 2.0;
            Self::new(0.0, half, half)
        } else {
            Self::new(tax_amount, 0.0, 0.0)
        }
    }

    pub fn negated(self) -> Self {
        Self::new(-self.igst, -self.cgst, -self.sgst)
    }

    pub fn rounded(self) -> Self {
        Self::new(round2(self.igst), round2(self.cgst), round2(self.sgst))
    }

    pub fn total(&self) -> f64 {
        self.igst + self.cgst + self.sgst
    }
}

impl AddAssign for TaxComponents {
    fn add_assign(&mut self, rhs: Self) {
        self.igst += rhs.igst;
        self.cgst += rhs.cgst;
        self.sgst += rhs.sgst;
    }
}

// ---------------------------------------------------------------------------
// Normalized input
// ---------------------------------------------------------------------------

/// One normalized sale (positive) or return (negative) line from any channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    /// Grouping key: the jurisdiction label as the channel keys it.
    pub jurisdiction_raw: String,
    pub taxable_value: f64,
    pub quantity: i64,
    pub tax: TaxComponents,
}

impl SalesRecord {
    /// Builds a record with the quantity sign aligned to the value: a negative
    /// taxable value always carries a non-positive quantity. Feeds that report
    /// returns as a positive count next to a negative amount are corrected here.
    pub fn new(jurisdiction_raw: String, taxable_value: f64, quantity: i64, tax: TaxComponents) -> Self {
        let quantity = if taxable_value < 0.0 { quantity.saturating_abs().saturating_neg() } else { quantity };
        Self { jurisdiction_raw, taxable_value, quantity, tax }
    }

    /// The same line with every amount and the quantity sign flipped.
    pub fn reversed(self) -> Self {
        Self::new(self.jurisdiction_raw, -self.taxable_value, self.quantity.saturating_neg(), self.tax.negated())
    }
}

// ---------------------------------------------------------------------------
// Per-channel summary
// ---------------------------------------------------------------------------

/// Totals for one jurisdiction grouping key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    /// Key the channel grouped on (raw label as it appeared, or its cleaned form).
    pub jurisdiction_key: String,
    /// Canonical display name the key resolves to.
    pub jurisdiction: String,
    pub taxable_value: f64,
    pub quantity: i64,
    #[serde(flatten)]
    pub tax: TaxComponents,
}

/// One marketplace's totals per jurisdiction, rebuilt on every upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelSummary {
    pub channel: String,
    pub rows: Vec<SummaryRow>,
}

impl ChannelSummary {
    pub fn taxable_value(&self) -> f64 {
        self.rows.iter().map(|r| r.taxable_value).sum()
    }

    pub fn quantity(&self) -> i64 {
        self.rows.iter().fold(0i64, |acc, r| acc.saturating_add(r.quantity))
    }

    pub fn row(&self, jurisdiction_key: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| r.jurisdiction_key == jurisdiction_key)
    }
}

// ---------------------------------------------------------------------------
// Consolidated summary
// ---------------------------------------------------------------------------

/// A channel summary row with its channel tag, as concatenated before re-grouping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedRow {
    pub channel: String,
    pub jurisdiction: String,
    pub taxable_value: f64,
    pub quantity: i64,
    #[serde(flatten)]
    pub tax: TaxComponents,
}

/// Cross-channel total for one canonical jurisdiction, rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidatedRow {
    pub jurisdiction: String,
    /// Channels that contributed to this jurisdiction, sorted.
    pub channels: Vec<String>,
    pub taxable_value: f64,
    pub quantity: i64,
    #[serde(flatten)]
    pub tax: TaxComponents,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ConsolidatedSummary {
    pub rows: Vec<ConsolidatedRow>,
}

impl ConsolidatedSummary {
    pub fn row(&self, jurisdiction: &str) -> Option<&ConsolidatedRow> {
        self.rows.iter().find(|r| r.jurisdiction == jurisdiction)
    }

    /// Grand totals across every jurisdiction, rounded to 2 decimals.
    pub fn totals(&self) -> (f64, i64, TaxComponents) {
        let mut value = 0.0;
        let mut quantity = 0;
        let mut tax = TaxComponents::default();
        for row in &self.rows {
            value += row.taxable_value;
            quantity = row.quantity.saturating_add(quantity);
            tax += row.tax;
        }
        (round2(value), quantity, tax.rounded())
    }
}
