use gstrecon_io::LoadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// Config validation error (no channels, duplicate names, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),

    /// A file could not be loaded (unsupported extension, corrupt content, unreadable).
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Required columns absent from an input that the run cannot do without.
    #[error("{role}: {file}: missing column(s) '{}'", .columns.join("', '"))]
    MissingColumn { role: String, file: String, columns: Vec<String> },

    /// Nothing usable left after validation.
    #[error("{role}: no valid input files")]
    NoValidInput { role: String },

    /// More input files than the consolidator accepts in one run.
    #[error("{role}: {given} files given, at most {max} allowed")]
    TooManyFiles { role: String, given: usize, max: usize },

    /// IO error (report write, etc.).
    #[error("IO error: {0}")]
    Io(String),
}

impl ReconError {
    pub(crate) fn missing(role: &str, file: &str, columns: Vec<String>) -> Self {
        Self::MissingColumn { role: role.to_string(), file: file.to_string(), columns }
    }
}
