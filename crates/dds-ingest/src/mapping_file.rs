//! Custom mapping files.
//!
//! A mapping file is a JSON object from raw column name to canonical field
//! key, e.g. `{"Ecell/V": "voltage_v"}`. Field keys are checked later
//! against the schema when options are validated.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::delimited::read_text;
use crate::error::{IngestError, Result};

/// Load a column-to-field mapping from a JSON file.
pub fn load_custom_mapping(path: &Path) -> Result<BTreeMap<String, String>> {
    let text = read_text(path)?;
    let mapping: BTreeMap<String, String> =
        serde_json::from_str(&text).map_err(|source| IngestError::MappingParse {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), entries = mapping.len(), "loaded custom mapping");
    Ok(mapping)
}
