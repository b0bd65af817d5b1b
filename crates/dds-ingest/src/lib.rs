//! Input handling for the data standardizer.
//!
//! Reads CSV, TSV and delimited text into [`dds_model::RawTable`] and loads
//! custom mapping files.

pub mod delimited;
pub mod error;
pub mod format;
pub mod mapping_file;

pub use delimited::{parse_delimited, read_delimited, read_table, sniff_delimiter};
pub use error::{IngestError, Result};
pub use format::FileFormat;
pub use mapping_file::load_custom_mapping;
