//! Picklist consolidation: several order-picking exports summed per SKU and
//! rolled up onto master SKUs through a mapping sheet.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use gstrecon_io::RawTable;
use serde::Serialize;

use crate::config::PicklistColumns;
use crate::error::ReconError;
use crate::numeric::coerce_quantity;

/// Master SKU bucket for picklist keys with no mapping entry.
pub const UNMAPPED_ITEM: &str = "UNMAPPED_ITEM";

/// Upper bound on picklist files per run.
pub const MAX_PICKLIST_FILES: usize = 10;

/// Which columns identify an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkuKey {
    #[default]
    Sku,
    SkuColorSize,
}

/// A picklist file left out of the run because it lacks required columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub file: String,
    pub missing: Vec<String>,
}

impl fmt::Display for SkippedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skipped {}: missing column(s) '{}'", self.file, self.missing.join("', '"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MasterSkuTotal {
    pub master_sku: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PicklistOutcome {
    /// Required quantity per master SKU, largest first.
    pub totals: Vec<MasterSkuTotal>,
    pub skipped: Vec<SkippedFile>,
    pub files_used: usize,
}

impl PicklistOutcome {
    pub fn quantity_for(&self, master_sku: &str) -> Option<i64> {
        self.totals.iter().find(|t| t.master_sku == master_sku).map(|t| t.quantity)
    }
}

#[derive(Debug, Clone)]
pub struct PicklistConsolidator {
    columns: PicklistColumns,
    key: SkuKey,
    max_files: usize,
}

impl PicklistConsolidator {
    pub fn new(columns: PicklistColumns, key: SkuKey) -> Self {
        Self { columns, key, max_files: MAX_PICKLIST_FILES }
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    fn key_columns(&self) -> Vec<&str> {
        match self.key {
            SkuKey::Sku => vec![self.columns.sku.as_str()],
            SkuKey::SkuColorSize => vec![
                self.columns.sku.as_str(),
                self.columns.color.as_str(),
                self.columns.size.as_str(),
            ],
        }
    }

    pub fn consolidate(&self, picklists: &[RawTable], mapping: &RawTable) -> Result<PicklistOutcome, ReconError> {
        if picklists.len() > self.max_files {
            return Err(ReconError::TooManyFiles {
                role: "picklist".into(),
                given: picklists.len(),
                max: self.max_files,
            });
        }

        let key_columns = self.key_columns();

        let mut mapping_required = key_columns.clone();
        mapping_required.push(&self.columns.master_sku);
        let missing = mapping.missing_columns(&mapping_required);
        if !missing.is_empty() {
            return Err(ReconError::missing("mapping", mapping.source(), missing));
        }
        let master_by_key = self.mapping_index(mapping, &key_columns);

        let mut picklist_required = key_columns.clone();
        picklist_required.push(&self.columns.quantity);

        let mut skipped = Vec::new();
        let mut per_key: BTreeMap<Vec<String>, i64> = BTreeMap::new();
        let mut files_used = 0;

        for table in picklists {
            let missing = table.missing_columns(&picklist_required);
            if !missing.is_empty() {
                let skip = SkippedFile { file: table.source().to_string(), missing };
                log::warn!("picklist: {skip}");
                skipped.push(skip);
                continue;
            }

            let key_idx: Vec<usize> = key_columns.iter().filter_map(|c| table.column_index(c)).collect();
            let qty_idx = table.column_index(&self.columns.quantity).unwrap_or_default();
            for row in 0..table.len() {
                let key = key_idx.iter().map(|&i| table.cell(row, i).trim().to_string()).collect();
                let total = per_key.entry(key).or_default();
                *total = total.saturating_add(coerce_quantity(table.cell(row, qty_idx)));
            }
            files_used += 1;
        }

        if files_used == 0 {
            return Err(ReconError::NoValidInput { role: "picklist".into() });
        }

        let mut per_master: BTreeMap<&str, i64> = BTreeMap::new();
        for (key, quantity) in &per_key {
            let master = master_by_key.get(key).map(|m| m.as_str()).unwrap_or(UNMAPPED_ITEM);
            let total = per_master.entry(master).or_default();
            *total = total.saturating_add(*quantity);
        }

        let mut totals: Vec<MasterSkuTotal> = per_master
            .into_iter()
            .map(|(master_sku, quantity)| MasterSkuTotal { master_sku: master_sku.to_string(), quantity })
            .collect();
        // Stable: ties stay in master SKU order.
        totals.sort_by(|a, b| b.quantity.cmp(&a.quantity));

        log::info!(
            "picklist: {} file(s), {} key(s), {} master SKU(s)",
            files_used,
            per_key.len(),
            totals.len()
        );

        Ok(PicklistOutcome { totals, skipped, files_used })
    }

    /// Key → master SKU. First entry for a key wins; blank master SKUs are ignored.
    fn mapping_index(&self, mapping: &RawTable, key_columns: &[&str]) -> HashMap<Vec<String>, String> {
        let key_idx: Vec<usize> = key_columns.iter().filter_map(|c| mapping.column_index(c)).collect();
        let master_idx = mapping.column_index(&self.columns.master_sku).unwrap_or_default();

        let mut index = HashMap::new();
        for row in 0..mapping.len() {
            let master = mapping.cell(row, master_idx).trim();
            if master.is_empty() {
                continue;
            }
            let key: Vec<String> = key_idx.iter().map(|&i| mapping.cell(row, i).trim().to_string()).collect();
            index.entry(key).or_insert_with(|| master.to_string());
        }
        index
    }
}
