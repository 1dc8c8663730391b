use std::path::Path;

use crate::error::LoadError;

/// Physical file format, chosen by extension only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Tsv,
    /// Anything calamine opens: xlsx, xlsm, xls, xlsb, ods.
    Spreadsheet,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        Self::from_name(&path.to_string_lossy())
    }

    pub fn from_name(name: &str) -> Result<Self, LoadError> {
        let file = Path::new(name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string());
        let extension = Path::new(name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" | "txt" => Ok(Self::Csv),
            "tsv" | "tab" => Ok(Self::Tsv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(Self::Spreadsheet),
            _ => Err(LoadError::UnsupportedFormat { file, extension }),
        }
    }

    /// Delimiter forced by the format, or `None` when it should be sniffed.
    pub fn fixed_delimiter(&self) -> Option<u8> {
        match self {
            Self::Tsv => Some(b'\t'),
            Self::Csv | Self::Spreadsheet => None,
        }
    }
}
