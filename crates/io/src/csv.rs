// CSV/TSV import

use std::path::Path;

use crate::error::LoadError;
use crate::table::{HeaderLayout, RawTable};

/// Parse CSV text into a table. `delimiter` of `None` sniffs it from the content.
pub fn parse_table(
    source: &str,
    content: &str,
    delimiter: Option<u8>,
    layout: HeaderLayout,
) -> Result<RawTable, LoadError> {
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(content));
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    let mut width: Option<usize> = None;
    for (row_idx, result) in reader.records().enumerate() {
        let record = result
            .map_err(|e| LoadError::malformed(source, format!("row {}: {e}", row_idx + 1)))?;
        let fields: Vec<String> = record.iter().map(|f| f.to_string()).collect();

        match width {
            None if fields.iter().any(|f| !f.trim().is_empty()) => width = Some(fields.len()),
            // Extra trailing cells are tolerated only when empty.
            Some(w) if fields[w.min(fields.len())..].iter().any(|f| !f.trim().is_empty()) => {
                return Err(LoadError::malformed(
                    source,
                    format!("row {}: expected {w} fields, saw {}", row_idx + 1, fields.len()),
                ));
            }
            _ => {}
        }
        records.push(fields);
    }

    RawTable::from_records(source, records, layout)
        .ok_or_else(|| LoadError::malformed(source, "no header row"))
}

/// Candidates in reverse priority: on a tied score the later one wins.
const DELIMITERS: [u8; 4] = [b'|', b';', b'\t', b','];

/// Pick the delimiter that splits the header into the most fields while the
/// first data rows keep the same width.
fn sniff_delimiter(content: &str) -> u8 {
    let sample = content.lines().take(8).collect::<Vec<_>>().join("\n");

    DELIMITERS
        .iter()
        .copied()
        .filter_map(|delim| {
            let widths: Vec<usize> = csv::ReaderBuilder::new()
                .delimiter(delim)
                .has_headers(false)
                .flexible(true)
                .from_reader(sample.as_bytes())
                .records()
                .filter_map(Result::ok)
                .map(|r| r.len())
                .collect();
            let header = *widths.first()?;
            if header < 2 {
                return None;
            }
            let agreeing = widths.iter().filter(|&&w| w == header).count();
            Some((agreeing * header, delim))
        })
        .max_by_key(|&(score, _)| score)
        .map_or(b',', |(_, delim)| delim)
}

/// Read a whole export as text, falling back to Windows-1252 for legacy files.
pub fn read_file_as_utf8(path: &Path) -> std::io::Result<String> {
    std::fs::read(path).map(decode_utf8)
}

/// UTF-8 when valid, otherwise Windows-1252 (common for Excel-exported CSVs).
pub fn decode_utf8(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    }
}
