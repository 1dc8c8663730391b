//! `gstrecon-io` — File loading for marketplace exports.
//!
//! Turns a CSV or spreadsheet export into a [`RawTable`]: header names plus
//! untyped string cells. No knowledge of any channel schema lives here; the
//! caller picks the [`HeaderLayout`] because the annotation-row convention
//! belongs to a channel's export template, not to the file format.

pub mod csv;
pub mod error;
pub mod format;
pub mod table;
pub mod xlsx;

use std::path::Path;

pub use error::LoadError;
pub use format::FileFormat;
pub use table::{HeaderLayout, RawTable};

/// Load a file from disk, picking the reader by extension.
pub fn load(path: &Path, layout: HeaderLayout) -> Result<RawTable, LoadError> {
    let name = display_name(path);
    let format = FileFormat::from_path(path)?;
    log::debug!("loading {name} as {format:?} ({layout:?})");

    match format {
        FileFormat::Csv | FileFormat::Tsv => {
            let content = csv::read_file_as_utf8(path).map_err(|e| LoadError::Io {
                file: name.clone(),
                reason: e.to_string(),
            })?;
            csv::parse_table(&name, &content, format.fixed_delimiter(), layout)
        }
        FileFormat::Spreadsheet => xlsx::import_path(&name, path, layout),
    }
}

/// Load an in-memory upload. `name` carries the extension used for format detection.
pub fn load_bytes(name: &str, bytes: &[u8], layout: HeaderLayout) -> Result<RawTable, LoadError> {
    let format = FileFormat::from_name(name)?;
    log::debug!("loading upload {name} as {format:?} ({layout:?})");

    match format {
        FileFormat::Csv | FileFormat::Tsv => {
            let content = csv::decode_utf8(bytes.to_vec());
            csv::parse_table(name, &content, format.fixed_delimiter(), layout)
        }
        FileFormat::Spreadsheet => xlsx::import_bytes(name, bytes, layout),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
