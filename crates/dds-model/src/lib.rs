//! Core data types for the dynamic data standardizer.
//!
//! Holds the canonical battery schema, raw tables produced by ingestion,
//! mapping and standardization results, and the cell/cycle records built
//! from them.

pub mod error;
pub mod mapping;
pub mod options;
pub mod record;
pub mod result;
pub mod schema;
pub mod table;

pub use error::{ConfigError, RecordError, TableError};
pub use mapping::{MappedColumn, Mapping, MappingSource};
pub use options::{AcceptPolicy, DEFAULT_THRESHOLD, DEFAULT_TOP_K, StandardizeOptions};
pub use record::{
    CapacityFade, CellFeatures, CellRecord, CycleRecord, CyclingProtocol, FeatureKind, SeriesStats,
    UNKNOWN_CELL_ID, VOLTAGE_CURVE_CYCLES, VoltageCurve,
};
pub use result::StandardizationResult;
pub use schema::{CanonicalField, CanonicalSchema, FieldGroup, FieldKind, keys};
pub use table::{CellValue, DataShape, RawColumn, RawTable};
