//! Error types for schema configuration, tables and record construction.

use std::path::PathBuf;

use thiserror::Error;

use crate::schema::FieldKind;

/// Invalid options, custom mappings or schema definitions.
///
/// Raised before any scoring runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Custom mapping targets a field that is not part of the canonical schema.
    #[error("custom mapping for column '{column}' targets unknown field '{field}'")]
    UnknownField { column: String, field: String },

    /// Two custom mapping entries target the same canonical field.
    #[error("canonical field '{field}' is targeted by both '{first}' and '{second}'")]
    DuplicateTarget {
        field: String,
        first: String,
        second: String,
    },

    /// Threshold is NaN or outside [0, 1].
    #[error("threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),

    /// Suggestion breadth of zero.
    #[error("top_k must be at least 1")]
    InvalidTopK,

    /// Scorer weights violate the weighting constraints.
    #[error("invalid score weights: {0}")]
    InvalidWeights(String),

    /// A canonical field key is defined more than once.
    #[error("canonical field '{0}' is defined more than once")]
    DuplicateField(String),

    /// A canonical field key is empty after trimming.
    #[error("canonical field keys must not be empty")]
    EmptyFieldKey,
}

/// Failures while building a [`crate::CellRecord`] from standardized data.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Mapped data does not fit the field's declared kind.
    #[error("field '{field}' expects {expected}, found '{found}'")]
    TypeMismatch {
        field: String,
        expected: FieldKind,
        found: String,
    },

    /// The source table had no columns or no rows, so there is nothing to build from.
    #[error("cannot build a cell record from a table with no data")]
    EmptyInput,

    /// Reading or writing a persisted record failed.
    #[error("failed to access record file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted record could not be encoded or decoded.
    #[error("invalid record JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Structural problems in a [`crate::RawTable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Two columns share a name.
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    /// A column's length differs from the first column's.
    #[error("column '{column}' has {actual} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
}
