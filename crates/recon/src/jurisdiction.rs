//! Jurisdiction (state) resolution.
//!
//! Export files spell states however the marketplace feels like: mixed case,
//! stray spaces, legacy names ("ORISSA"), run-together words ("TAMILNADU").
//! A resolver turns a cleaned label into the one display name used on the
//! filing. Unknown labels are not errors: they fall back to title case.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Deserialize;

/// Upper-cased label variants → canonical display name.
const STATE_NAMES: &[(&str, &str)] = &[
    ("ANDHRA PRADESH", "Andhra Pradesh"),
    ("ARUNACHAL PRADESH", "Arunachal Pradesh"),
    ("ASSAM", "Assam"),
    ("BIHAR", "Bihar"),
    ("CHHATTISGARH", "Chhattisgarh"),
    ("GOA", "Goa"),
    ("GUJARAT", "Gujarat"),
    ("HARYANA", "Haryana"),
    ("HIMACHAL PRADESH", "Himachal Pradesh"),
    ("JAMMU & KASHMIR", "Jammu & Kashmir"),
    ("JAMMU AND KASHMIR", "Jammu & Kashmir"),
    ("JHARKHAND", "Jharkhand"),
    ("KARNATAKA", "Karnataka"),
    ("KERALA", "Kerala"),
    ("MADHYA PRADESH", "Madhya Pradesh"),
    ("MAHARASHTRA", "Maharashtra"),
    ("MANIPUR", "Manipur"),
    ("MEGHALAYA", "Meghalaya"),
    ("MIZORAM", "Mizoram"),
    ("NAGALAND", "Nagaland"),
    ("ODISHA", "Odisha"),
    ("ORISSA", "Odisha"),
    ("PUNJAB", "Punjab"),
    ("RAJASTHAN", "Rajasthan"),
    ("SIKKIM", "Sikkim"),
    ("TAMIL NADU", "Tamil Nadu"),
    ("TAMILNADU", "Tamil Nadu"),
    ("TELANGANA", "Telangana"),
    ("TRIPURA", "Tripura"),
    ("UTTAR PRADESH", "Uttar Pradesh"),
    ("UTTARAKHAND", "Uttarakhand"),
    ("WEST BENGAL", "West Bengal"),
    ("ANDAMAN & NICOBAR ISLANDS", "Andaman & Nicobar Islands"),
    ("ANDAMAN AND NICOBAR ISLANDS", "Andaman & Nicobar Islands"),
    ("CHANDIGARH", "Chandigarh"),
    ("DADRA & NAGAR HAVELI", "Dadra & Nagar Haveli"),
    ("DAMAN & DIU", "Daman & Diu"),
    ("DELHI", "Delhi"),
    ("NEW DELHI", "Delhi"),
    ("LADAKH", "Ladakh"),
    ("LAKSHADWEEP", "Lakshadweep"),
    ("PUDUCHERRY", "Puducherry"),
    ("PONDICHERRY", "Puducherry"),
];

static STATE_MAP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| STATE_NAMES.iter().copied().collect());

/// Display name used when a label is blank.
pub const UNKNOWN_JURISDICTION: &str = "Unknown";

/// Grouping key for a raw label: trimmed and upper-cased, nothing else.
pub fn clean_label(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Every canonical display name, sorted and de-duplicated.
pub fn canonical_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = STATE_NAMES.iter().map(|(_, name)| *name).collect();
    names.sort_unstable();
    names.dedup();
    names
}

/// Maps a cleaned label to its canonical display name. Total: never fails,
/// never returns an empty string.
pub trait JurisdictionResolver: Send + Sync {
    fn resolve(&self, label: &str) -> String;
}

/// Full synonym table lookup with title-case fallback. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct SynonymResolver;

impl JurisdictionResolver for SynonymResolver {
    fn resolve(&self, label: &str) -> String {
        let lookup = collapse_whitespace(&clean_label(label));
        if lookup.is_empty() {
            return UNKNOWN_JURISDICTION.to_string();
        }
        match STATE_MAP.get(lookup.as_str()) {
            Some(name) => name.to_string(),
            None => title_case(&lookup),
        }
    }
}

/// Groups labels by their first `width` characters, title-cased.
///
/// Reproduces an older dashboard build that keyed states on a name prefix.
/// It merges distinct states that share a prefix ("MADHYA PRADESH" and
/// "MADHYA ..."), and splits synonyms ("ORISSA"/"ODISHA"), so it is only
/// offered for comparing against filings produced by that build.
#[derive(Debug, Clone, Copy)]
pub struct TruncatingResolver {
    pub width: usize,
}

impl Default for TruncatingResolver {
    fn default() -> Self {
        Self { width: 5 }
    }
}

impl JurisdictionResolver for TruncatingResolver {
    fn resolve(&self, label: &str) -> String {
        let cleaned = clean_label(label);
        let prefix: String = cleaned.chars().take(self.width.max(1)).collect();
        let prefix = prefix.trim_end();
        if prefix.is_empty() {
            return UNKNOWN_JURISDICTION.to_string();
        }
        title_case(prefix)
    }
}

/// Which resolver a filing run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolverStrategy {
    #[default]
    SynonymMap,
    Truncate,
}

impl ResolverStrategy {
    pub fn build(&self) -> Box<dyn JurisdictionResolver> {
        match self {
            Self::SynonymMap => Box::new(SynonymResolver),
            Self::Truncate => Box::new(TruncatingResolver::default()),
        }
    }
}

/// Resolve with the default synonym table.
pub fn resolve(label: &str) -> String {
    SynonymResolver.resolve(label)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
