//! Input format detection.

use std::fmt;
use std::path::Path;

/// Input file format, detected from the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Tsv,
    /// Delimited text with an unknown separator.
    Text,
    Excel,
    Pickle,
    Matlab,
    Unknown,
}

impl FileFormat {
    pub fn detect(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Self::Csv,
            Some("tsv") => Self::Tsv,
            Some("txt") => Self::Text,
            Some("xlsx" | "xls") => Self::Excel,
            Some("pkl" | "pickle") => Self::Pickle,
            Some("mat") => Self::Matlab,
            _ => Self::Unknown,
        }
    }

    /// Whether the delimited-text reader can decode this format.
    pub fn is_readable(&self) -> bool {
        matches!(self, Self::Csv | Self::Tsv | Self::Text)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Text => "text",
            Self::Excel => "excel",
            Self::Pickle => "pickle",
            Self::Matlab => "matlab",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
