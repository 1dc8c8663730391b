use thiserror::Error;

/// Per-file load failure. Always names the offending file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Extension is not one of the supported tabular formats.
    #[error("{file}: unsupported file format '{extension}' (expected csv, tsv, xlsx, xls, xlsb or ods)")]
    UnsupportedFormat { file: String, extension: String },

    /// Content could not be parsed as a table.
    #[error("{file}: malformed file: {reason}")]
    Malformed { file: String, reason: String },

    /// File could not be read at all.
    #[error("{file}: {reason}")]
    Io { file: String, reason: String },
}

impl LoadError {
    pub fn malformed(file: &str, reason: impl Into<String>) -> Self {
        Self::Malformed { file: file.to_string(), reason: reason.into() }
    }

    /// Name of the file this error refers to.
    pub fn file(&self) -> &str {
        match self {
            Self::UnsupportedFormat { file, .. } | Self::Malformed { file, .. } | Self::Io { file, .. } => file,
        }
    }
}
