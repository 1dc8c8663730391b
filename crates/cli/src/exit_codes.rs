//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3-9     | load             | Reading input files                      |
//! | 10-19   | filing           | Config, schema and channel outcomes      |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `recon_exit_code` or the relevant command

use gstrecon_io::LoadError;
use gstrecon_recon::ReconError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Load (3-9)
// =============================================================================

/// Input file extension is not a supported tabular format.
pub const EXIT_LOAD_UNSUPPORTED: u8 = 3;

/// Input file could not be parsed.
pub const EXIT_LOAD_MALFORMED: u8 = 4;

/// Input or output file could not be read or written.
pub const EXIT_LOAD_IO: u8 = 5;

// =============================================================================
// Filing (10-19)
// =============================================================================

/// Filing config failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 10;

/// A required column is absent from an input file.
pub const EXIT_MISSING_COLUMN: u8 = 11;

/// No usable input file remained after validation.
pub const EXIT_NO_VALID_INPUT: u8 = 12;

/// More files were given than a run accepts.
pub const EXIT_TOO_MANY_FILES: u8 = 13;

/// A filing run completed but at least one channel failed.
/// Outputs for the remaining channels were still written.
pub const EXIT_CHANNEL_FAILED: u8 = 14;

// =============================================================================
// Error mapping
// =============================================================================

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        ReconError::Load(load) => load_exit_code(load),
        ReconError::MissingColumn { .. } => EXIT_MISSING_COLUMN,
        ReconError::NoValidInput { .. } => EXIT_NO_VALID_INPUT,
        ReconError::TooManyFiles { .. } => EXIT_TOO_MANY_FILES,
        ReconError::Io(_) => EXIT_LOAD_IO,
    }
}

pub fn load_exit_code(err: &LoadError) -> u8 {
    match err {
        LoadError::UnsupportedFormat { .. } => EXIT_LOAD_UNSUPPORTED,
        LoadError::Malformed { .. } => EXIT_LOAD_MALFORMED,
        LoadError::Io { .. } => EXIT_LOAD_IO,
    }
}
