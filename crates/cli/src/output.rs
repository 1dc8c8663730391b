//! Shared input loading and output writing for the subcommands.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use gstrecon_io::{HeaderLayout, RawTable};
use gstrecon_recon::ReconError;

use crate::CliError;

pub fn load_tables(paths: &[PathBuf], layout: HeaderLayout) -> Result<Vec<RawTable>, CliError> {
    paths
        .iter()
        .map(|p| gstrecon_io::load(p, layout).map_err(CliError::from))
        .collect()
}

/// Run a CSV writer against `path`, or stdout when no path is given.
pub fn write_to<F>(path: Option<&Path>, write: F) -> Result<(), CliError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), ReconError>,
{
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .map_err(|e| CliError::io(format!("cannot create {}: {e}", parent.display())))?;
            }
            let file = File::create(path)
                .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))?;
            let mut out = BufWriter::new(file);
            write(&mut out)?;
            out.flush()
                .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))?;
            eprintln!("wrote {}", path.display());
            Ok(())
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write(&mut handle)?;
            Ok(())
        }
    }
}

/// Serialize `value` as pretty JSON to stdout.
pub fn emit_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
    println!("{json}");
    Ok(())
}
