use std::collections::HashSet;

use gstrecon_io::HeaderLayout;
use serde::Deserialize;

use crate::error::ReconError;
use crate::jurisdiction::ResolverStrategy;

/// Seller GSTIN / account selector value meaning "no filtering".
pub const ALL_ACCOUNTS: &str = "ALL";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// One filing run: which channel exports to read and how to key them.
#[derive(Debug, Clone, Deserialize)]
pub struct FilingConfig {
    pub name: String,
    /// State the seller is registered in. Sales into it split tax into CGST + SGST.
    #[serde(default = "default_home_jurisdiction")]
    pub home_jurisdiction: String,
    #[serde(default)]
    pub resolver: ResolverStrategy,
    pub channels: Vec<ChannelConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_home_jurisdiction() -> String {
    "HARYANA".into()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Consolidated CSV path, relative to the config file.
    #[serde(default)]
    pub consolidated: Option<String>,
    /// Directory for one `<channel>.csv` per processed channel.
    #[serde(default)]
    pub per_channel_dir: Option<String>,
}

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChannelConfig {
    /// Invoice-level export carrying all three tax heads per line.
    InvoiceLevel(InvoiceChannelConfig),
    /// Separate sales and returns exports with one combined tax column.
    SalesReturns(SplitChannelConfig),
}

impl ChannelConfig {
    pub fn name(&self) -> &str {
        match self {
            Self::InvoiceLevel(c) => &c.name,
            Self::SalesReturns(c) => &c.name,
        }
    }

    fn file_count(&self) -> usize {
        match self {
            Self::InvoiceLevel(c) => c.files.len(),
            Self::SalesReturns(c) => c.sales.len(),
        }
    }

    /// Every input path the channel names, sales before returns.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        let (primary, returns) = match self {
            Self::InvoiceLevel(c) => (c.files.as_slice(), Default::default()),
            Self::SalesReturns(c) => (c.sales.as_slice(), c.returns.as_slice()),
        };
        primary.iter().chain(returns).map(String::as_str)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceChannelConfig {
    pub name: String,
    /// One file per reporting period; rows are concatenated.
    pub files: Vec<String>,
    /// Seller GSTIN to keep, or `ALL`.
    #[serde(default = "default_account")]
    pub account: String,
    #[serde(default = "default_invoice_layout")]
    pub layout: HeaderLayout,
    #[serde(default)]
    pub columns: InvoiceColumns,
}

fn default_account() -> String {
    ALL_ACCOUNTS.into()
}

fn default_invoice_layout() -> HeaderLayout {
    HeaderLayout::HeaderWithAnnotation
}

#[derive(Debug, Clone, Deserialize)]
pub struct SplitChannelConfig {
    pub name: String,
    pub sales: Vec<String>,
    #[serde(default)]
    pub returns: Vec<String>,
    #[serde(default)]
    pub layout: HeaderLayout,
    #[serde(default)]
    pub columns: SplitColumns,
}

// ---------------------------------------------------------------------------
// Column mappings
// ---------------------------------------------------------------------------

/// Column names of the invoice-level sales report. Case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InvoiceColumns {
    pub seller: String,
    pub taxable_value: String,
    pub quantity: String,
    pub igst: String,
    pub cgst: String,
    pub sgst: String,
    pub billing_state: String,
}

impl Default for InvoiceColumns {
    fn default() -> Self {
        Self {
            seller: "Seller GSTIN".into(),
            taxable_value: "Taxable Value (Final Invoice Amount -Taxes)".into(),
            quantity: "Item Quantity".into(),
            igst: "IGST Amount".into(),
            cgst: "CGST Amount".into(),
            sgst: "SGST Amount (Or UTGST as applicable)".into(),
            billing_state: "Customer's Billing State".into(),
        }
    }
}

/// Column names shared by the sales and returns exports of a split channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SplitColumns {
    pub quantity: String,
    pub taxable_value: String,
    pub tax_amount: String,
    pub state: String,
}

impl Default for SplitColumns {
    fn default() -> Self {
        Self {
            quantity: "quantity".into(),
            taxable_value: "total_taxable_sale_value".into(),
            tax_amount: "tax_amount".into(),
            state: "end_customer_state_new".into(),
        }
    }
}

/// Column names of picklist and SKU-mapping sheets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PicklistColumns {
    pub sku: String,
    pub color: String,
    pub size: String,
    pub quantity: String,
    pub master_sku: String,
}

impl Default for PicklistColumns {
    fn default() -> Self {
        Self {
            sku: "SKU".into(),
            color: "Color".into(),
            size: "Size".into(),
            quantity: "Quantity".into(),
            master_sku: "Master SKU".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl FilingConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: FilingConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.channels.is_empty() {
            return Err(ReconError::ConfigValidation("at least one channel is required".into()));
        }

        if self.home_jurisdiction.trim().is_empty() {
            return Err(ReconError::ConfigValidation("home_jurisdiction must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for channel in &self.channels {
            let name = channel.name();
            if name.trim().is_empty() {
                return Err(ReconError::ConfigValidation("channel name must not be empty".into()));
            }
            if !seen.insert(name) {
                return Err(ReconError::ConfigValidation(format!("duplicate channel name '{name}'")));
            }
            if channel.file_count() == 0 {
                return Err(ReconError::ConfigValidation(format!(
                    "channel '{name}': no input files"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
