//! Channel-boundary execution for a filing run.
//!
//! Each channel loads, normalizes and summarizes on its own. A failure in one
//! channel (bad file, missing column) is captured and reported; the other
//! channels still produce summaries and the merge uses whatever succeeded.

use std::path::Path;

use gstrecon_io::HeaderLayout;
use serde::Serialize;

use crate::config::{ChannelConfig, FilingConfig};
use crate::error::ReconError;
use crate::jurisdiction::JurisdictionResolver;
use crate::merge::SummaryBook;
use crate::model::{ChannelSummary, ConsolidatedSummary};
use crate::normalize::{build_normalizer, ChannelInput};

/// Outcome of one channel's run.
#[derive(Debug)]
pub struct ChannelRun {
    pub channel: String,
    pub result: Result<ChannelSummary, ReconError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelStatus {
    Processed,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelReport {
    pub channel: String,
    pub status: ChannelStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub jurisdictions: usize,
}

/// Everything a filing run produced, for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct FilingReport {
    pub name: String,
    pub engine_version: String,
    pub run_at: String,
    pub home_jurisdiction: String,
    pub channels: Vec<ChannelReport>,
    pub summaries: Vec<ChannelSummary>,
    pub consolidated: ConsolidatedSummary,
}

impl FilingReport {
    /// Assemble the report from per-channel statuses and the summaries currently held.
    pub fn build(config: &FilingConfig, channels: Vec<ChannelReport>, book: &SummaryBook) -> Self {
        Self {
            name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            home_jurisdiction: config.home_jurisdiction.clone(),
            channels,
            summaries: book.summaries().cloned().collect(),
            consolidated: book.consolidate(),
        }
    }

    pub fn failed(&self) -> usize {
        self.channels.iter().filter(|c| c.status == ChannelStatus::Failed).count()
    }

    pub fn to_json_pretty(&self) -> Result<String, ReconError> {
        serde_json::to_string_pretty(self).map_err(|e| ReconError::Io(format!("JSON serialization error: {e}")))
    }
}

/// Load every file a channel names. Relative paths resolve against `base_dir`.
pub fn load_channel_input(
    config: &ChannelConfig,
    layout: HeaderLayout,
    base_dir: &Path,
) -> Result<ChannelInput, ReconError> {
    let load_all = |files: &[String]| -> Result<Vec<_>, ReconError> {
        files
            .iter()
            .map(|f| gstrecon_io::load(&base_dir.join(f), layout).map_err(ReconError::from))
            .collect()
    };

    match config {
        ChannelConfig::InvoiceLevel(c) => Ok(ChannelInput { sales: load_all(&c.files)?, returns: Vec::new() }),
        ChannelConfig::SalesReturns(c) => Ok(ChannelInput {
            sales: load_all(&c.sales)?,
            returns: load_all(&c.returns)?,
        }),
    }
}

/// Load and summarize one channel.
pub fn process_channel(
    config: &ChannelConfig,
    home_jurisdiction: &str,
    base_dir: &Path,
    resolver: &dyn JurisdictionResolver,
) -> Result<ChannelSummary, ReconError> {
    let normalizer = build_normalizer(config, home_jurisdiction);
    let input = load_channel_input(config, normalizer.layout(), base_dir)?;
    normalizer.summarize(&input, resolver)
}

/// Run every configured channel independently.
pub fn process_channels(config: &FilingConfig, base_dir: &Path) -> Vec<ChannelRun> {
    let resolver = config.resolver.build();

    config
        .channels
        .iter()
        .map(|channel| {
            let result = process_channel(channel, &config.home_jurisdiction, base_dir, resolver.as_ref());
            match &result {
                Ok(summary) => log::info!(
                    "channel '{}': {} jurisdiction(s)",
                    channel.name(),
                    summary.rows.len()
                ),
                Err(e) => log::warn!("channel '{}' failed: {e}", channel.name()),
            }
            ChannelRun { channel: channel.name().to_string(), result }
        })
        .collect()
}

/// Move successful summaries into the caller's book (replacing earlier uploads)
/// and report the status of every run.
pub fn record_runs(book: &mut SummaryBook, runs: Vec<ChannelRun>) -> Vec<ChannelReport> {
    runs.into_iter()
        .map(|run| match run.result {
            Ok(summary) => {
                let jurisdictions = summary.rows.len();
                book.insert(summary);
                ChannelReport { channel: run.channel, status: ChannelStatus::Processed, error: None, jurisdictions }
            }
            Err(e) => ChannelReport {
                channel: run.channel,
                status: ChannelStatus::Failed,
                error: Some(e.to_string()),
                jurisdictions: 0,
            },
        })
        .collect()
}
