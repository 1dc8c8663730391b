//! `gstrecon-recon` — Multi-channel GST sales reconciliation engine.
//!
//! Normalizes per-channel sales exports into jurisdiction summaries, merges
//! them into one consolidated filing view, and consolidates picklists by
//! master SKU. File decoding lives in `gstrecon-io`; nothing here touches a
//! terminal.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod jurisdiction;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod numeric;
pub mod picklist;
pub mod report;
pub mod runner;

pub use config::{ChannelConfig, FilingConfig, PicklistColumns};
pub use error::ReconError;
pub use jurisdiction::{resolve, JurisdictionResolver, ResolverStrategy, SynonymResolver, TruncatingResolver};
pub use merge::{merge, tagged_rows, SummaryBook};
pub use model::{ChannelSummary, ConsolidatedRow, ConsolidatedSummary, SalesRecord, SummaryRow, TaxComponents};
pub use normalize::{AccountFilter, ChannelInput, ChannelNormalizer, InvoiceLevelNormalizer, SalesReturnsNormalizer};
pub use picklist::{PicklistConsolidator, PicklistOutcome, SkuKey, UNMAPPED_ITEM};
pub use runner::{process_channels, record_runs, ChannelReport, ChannelStatus, FilingReport};
