//! Channel normalizers: one marketplace export schema in, one `ChannelSummary` out.
//!
//! Adding a channel means adding a `ChannelNormalizer`; the aggregator and
//! merger only ever see `SalesRecord`s and `ChannelSummary`s.

pub mod invoice;
pub mod split;

use gstrecon_io::{HeaderLayout, RawTable};

use crate::config::ChannelConfig;
use crate::error::ReconError;
use crate::jurisdiction::JurisdictionResolver;
use crate::model::ChannelSummary;

pub use invoice::{AccountFilter, InvoiceLevelNormalizer, NormalizedSales};
pub use split::SalesReturnsNormalizer;

/// Loaded input for one channel run.
///
/// Channels whose exports mix sales and returns in one file only use `sales`.
#[derive(Debug, Clone, Default)]
pub struct ChannelInput {
    pub sales: Vec<RawTable>,
    pub returns: Vec<RawTable>,
}

pub trait ChannelNormalizer {
    /// Channel tag carried into the summary.
    fn channel(&self) -> &str;

    /// Header layout of this channel's export template.
    fn layout(&self) -> HeaderLayout;

    /// Normalize and aggregate one upload into a per-jurisdiction summary.
    fn summarize(
        &self,
        input: &ChannelInput,
        resolver: &dyn JurisdictionResolver,
    ) -> Result<ChannelSummary, ReconError>;
}

/// Build the normalizer a channel config asks for.
pub fn build_normalizer(config: &ChannelConfig, home_jurisdiction: &str) -> Box<dyn ChannelNormalizer> {
    match config {
        ChannelConfig::InvoiceLevel(c) => Box::new(InvoiceLevelNormalizer::from_config(c)),
        ChannelConfig::SalesReturns(c) => Box::new(SalesReturnsNormalizer::from_config(c, home_jurisdiction)),
    }
}

/// Resolve column positions in one table, or report every missing one.
pub(crate) fn column_indices<const N: usize>(
    role: &str,
    table: &RawTable,
    columns: [&str; N],
) -> Result<[usize; N], ReconError> {
    let missing = table.missing_columns(&columns);
    if !missing.is_empty() {
        return Err(ReconError::missing(role, table.source(), missing));
    }
    let mut indices = [0usize; N];
    for (slot, name) in indices.iter_mut().zip(columns) {
        *slot = table.column_index(name).unwrap_or_default();
    }
    Ok(indices)
}
