//! Output of a standardization run.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::mapping::Mapping;
use crate::table::{CellValue, DataShape};

/// Everything a standardization run produced.
///
/// Values are regrouped, never transformed: `standardized_data[field]` holds
/// exactly the values of the column mapped to `field`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardizationResult {
    /// Accepted `column -> field` assignments, in input column order.
    pub mapping_used: Mapping,
    /// Columns without a field, in input order.
    pub unmapped_columns: Vec<String>,
    pub raw_data_shape: DataShape,
    /// Values keyed by canonical field key.
    pub standardized_data: BTreeMap<String, Vec<CellValue>>,
    /// Values of unmapped columns keyed by their original name.
    pub unmapped_data: BTreeMap<String, Vec<CellValue>>,
}

impl StandardizationResult {
    /// Result for a table without columns.
    pub fn empty(raw_data_shape: DataShape) -> Self {
        Self {
            mapping_used: Mapping::new(),
            unmapped_columns: Vec::new(),
            raw_data_shape,
            standardized_data: BTreeMap::new(),
            unmapped_data: BTreeMap::new(),
        }
    }

    pub fn mapped_count(&self) -> usize {
        self.mapping_used.len()
    }

    pub fn unmapped_count(&self) -> usize {
        self.unmapped_columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw_data_shape.columns == 0
    }
}
