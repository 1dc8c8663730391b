use std::collections::{BTreeMap, BTreeSet};

use crate::model::{ChannelSummary, ConsolidatedRow, ConsolidatedSummary, TaggedRow, TaxComponents};
use crate::numeric::round2;

/// Concatenate channel summaries, keeping each row's channel tag.
pub fn tagged_rows<'a>(summaries: impl IntoIterator<Item = &'a ChannelSummary>) -> Vec<TaggedRow> {
    summaries
        .into_iter()
        .flat_map(|summary| {
            summary.rows.iter().map(|row| TaggedRow {
                channel: summary.channel.clone(),
                jurisdiction: row.jurisdiction.clone(),
                taxable_value: row.taxable_value,
                quantity: row.quantity,
                tax: row.tax,
            })
        })
        .collect()
}

/// Re-group every channel's rows by canonical jurisdiction and re-sum.
///
/// Pure: the output depends only on the summaries given, so merging the same
/// set twice yields the same table. Rows are sorted by jurisdiction.
pub fn merge<'a>(summaries: impl IntoIterator<Item = &'a ChannelSummary>) -> ConsolidatedSummary {
    let mut groups: BTreeMap<String, (BTreeSet<String>, f64, i64, TaxComponents)> = BTreeMap::new();

    for row in tagged_rows(summaries) {
        let entry = groups.entry(row.jurisdiction).or_default();
        entry.0.insert(row.channel);
        entry.1 += row.taxable_value;
        entry.2 = entry.2.saturating_add(row.quantity);
        entry.3 += row.tax;
    }

    ConsolidatedSummary {
        rows: groups
            .into_iter()
            .map(|(jurisdiction, (channels, taxable_value, quantity, tax))| ConsolidatedRow {
                jurisdiction,
                channels: channels.into_iter().collect(),
                taxable_value: round2(taxable_value),
                quantity,
                tax: tax.rounded(),
            })
            .collect(),
    }
}

/// Channel summaries waiting to be merged, one per channel.
///
/// Owned by whoever drives the pipeline. Re-uploading a channel replaces its
/// summary; a channel is only here once it processed successfully.
#[derive(Debug, Clone, Default)]
pub struct SummaryBook {
    summaries: BTreeMap<String, ChannelSummary>,
}

impl SummaryBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a channel's summary, returning the one it replaced.
    pub fn insert(&mut self, summary: ChannelSummary) -> Option<ChannelSummary> {
        self.summaries.insert(summary.channel.clone(), summary)
    }

    pub fn remove(&mut self, channel: &str) -> Option<ChannelSummary> {
        self.summaries.remove(channel)
    }

    pub fn get(&self, channel: &str) -> Option<&ChannelSummary> {
        self.summaries.get(channel)
    }

    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.summaries.keys().map(|k| k.as_str())
    }

    pub fn summaries(&self) -> impl Iterator<Item = &ChannelSummary> {
        self.summaries.values()
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Merge whatever is currently held.
    pub fn consolidate(&self) -> ConsolidatedSummary {
        merge(self.summaries.values())
    }
}
