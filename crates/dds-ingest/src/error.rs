//! Error types for data ingestion.

use std::path::PathBuf;

use dds_model::TableError;
use thiserror::Error;

use crate::format::FileFormat;

/// Errors that can occur while reading input files.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file does not exist.
    #[error("input file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Format Errors ===
    /// Extension is known but cannot be decoded, or is not known at all.
    #[error("unsupported file format '{format}' for {path} (readable: csv, tsv, txt)")]
    UnsupportedFormat { path: PathBuf, format: FileFormat },

    /// Malformed delimited text.
    #[error("failed to parse {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Parsed columns do not form a valid table.
    #[error("invalid table in {path}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: TableError,
    },

    // === Mapping File Errors ===
    /// Custom mapping file is not a JSON object of strings.
    #[error("invalid mapping file {path}: {source}")]
    MappingParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
