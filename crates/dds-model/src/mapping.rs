//! Column-to-field mappings.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Where a mapping entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingSource {
    /// Supplied by the caller; bypasses scoring.
    Custom,
    /// Chosen by the mapping resolver.
    Automatic,
}

/// One accepted column-to-field assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedColumn {
    /// Input column name as it appeared in the source.
    pub column: String,
    /// Canonical field key.
    pub field: String,
    /// Similarity score the assignment was accepted with (1.0 for custom entries).
    pub score: f64,
    pub source: MappingSource,
}

/// An ordered mapping from input columns to canonical fields.
///
/// Each canonical field appears at most once. Entries keep insertion order,
/// which callers use to preserve the input column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<MappedColumn>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry unless its field is already taken.
    ///
    /// Returns `false` and leaves the mapping untouched when the field is
    /// already assigned.
    pub fn insert(&mut self, entry: MappedColumn) -> bool {
        if self.contains_field(&entry.field) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Entry for a column name (the first one when names repeat).
    pub fn get(&self, column: &str) -> Option<&MappedColumn> {
        self.entries.iter().find(|entry| entry.column == column)
    }

    pub fn field_for(&self, column: &str) -> Option<&str> {
        self.get(column).map(|entry| entry.field.as_str())
    }

    pub fn column_for(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.column.as_str())
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.entries.iter().any(|entry| entry.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MappedColumn> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = &'a MappedColumn;
    type IntoIter = std::slice::Iter<'a, MappedColumn>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// Serialized as a `{ column: field }` object in insertion order.
impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.column, &entry.field)?;
        }
        map.end()
    }
}
