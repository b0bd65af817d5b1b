//! Raw tabular input as produced by ingestion.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// A single raw cell value.
///
/// Serializes untagged: numbers as JSON numbers, text as strings and
/// missing values as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Missing,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
}

const MISSING_MARKERS: [&str; 8] = ["", "na", "n/a", "nan", "null", "none", "-nan", "#n/a"];

impl CellValue {
    /// Infer a value from raw text.
    ///
    /// Missing markers (empty, `NA`, `NaN`, `null`, ...) become [`CellValue::Missing`];
    /// whole numbers become integers, other numbers floats, `true`/`false`
    /// booleans, everything else text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if MISSING_MARKERS.contains(&lower.as_str()) {
            return CellValue::Missing;
        }
        if let Ok(value) = trimmed.parse::<i64>() {
            return CellValue::Integer(value);
        }
        if let Ok(value) = trimmed.parse::<f64>()
            && value.is_finite()
        {
            return CellValue::Float(value);
        }
        match lower.as_str() {
            "true" => CellValue::Boolean(true),
            "false" => CellValue::Boolean(false),
            _ => CellValue::Text(trimmed.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Numeric view; integers widen to floats. Text and booleans are not numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(value) => Some(*value as f64),
            CellValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Whole-number view; floats qualify only without a fractional part.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(value) => Some(*value),
            CellValue::Float(value)
                if value.fract() == 0.0 && *value >= i64::MIN as f64 && *value <= i64::MAX as f64 =>
            {
                Some(*value as i64)
            }
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Missing => f.write_str(""),
            CellValue::Integer(value) => write!(f, "{value}"),
            CellValue::Float(value) => write!(f, "{value}"),
            CellValue::Boolean(value) => write!(f, "{value}"),
            CellValue::Text(value) => f.write_str(value),
        }
    }
}

/// Row and column count of a raw table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DataShape {
    pub rows: usize,
    pub columns: usize,
}

impl fmt::Display for DataShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.rows, self.columns)
    }
}

/// One named input column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawColumn {
    pub name: String,
    pub values: Vec<CellValue>,
}

impl RawColumn {
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// An ordered set of uniquely named, equally long columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RawTable {
    columns: Vec<RawColumn>,
    rows: usize,
}

impl RawTable {
    pub fn new(columns: Vec<RawColumn>) -> Result<Self, TableError> {
        let rows = columns.first().map_or(0, |column| column.values.len());
        for (idx, column) in columns.iter().enumerate() {
            if columns[..idx].iter().any(|prior| prior.name == column.name) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
            if column.values.len() != rows {
                return Err(TableError::LengthMismatch {
                    column: column.name.clone(),
                    expected: rows,
                    actual: column.values.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[RawColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&RawColumn> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.name.clone()).collect()
    }

    pub fn shape(&self) -> DataShape {
        DataShape {
            rows: self.rows,
            columns: self.columns.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_infers_variants() {
        assert_eq!(CellValue::parse("42"), CellValue::Integer(42));
        assert_eq!(CellValue::parse(" 3.5 "), CellValue::Float(3.5));
        assert_eq!(CellValue::parse("1e-3"), CellValue::Float(0.001));
        assert_eq!(CellValue::parse("TRUE"), CellValue::Boolean(true));
        assert_eq!(CellValue::parse("NaN"), CellValue::Missing);
        assert_eq!(CellValue::parse(""), CellValue::Missing);
        assert_eq!(CellValue::parse("N/A"), CellValue::Missing);
        assert_eq!(CellValue::parse("LFP"), CellValue::Text("LFP".to_string()));
    }

    #[test]
    fn numeric_views() {
        assert_eq!(CellValue::Integer(2).as_f64(), Some(2.0));
        assert_eq!(CellValue::Float(2.0).as_i64(), Some(2));
        assert_eq!(CellValue::Float(2.5).as_i64(), None);
        assert_eq!(CellValue::Text("2".to_string()).as_f64(), None);
        assert_eq!(CellValue::Boolean(true).as_f64(), None);
    }

    #[test]
    fn table_rejects_duplicate_names() {
        let columns = vec![
            RawColumn::new("V", vec![CellValue::Integer(1)]),
            RawColumn::new("V", vec![CellValue::Integer(2)]),
        ];
        assert_eq!(
            RawTable::new(columns),
            Err(TableError::DuplicateColumn("V".to_string()))
        );
    }

    #[test]
    fn table_rejects_ragged_columns() {
        let columns = vec![
            RawColumn::new("V", vec![CellValue::Integer(1), CellValue::Integer(2)]),
            RawColumn::new("I", vec![CellValue::Integer(2)]),
        ];
        assert!(matches!(
            RawTable::new(columns),
            Err(TableError::LengthMismatch { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn shape_counts_rows_and_columns() {
        let table = RawTable::new(vec![
            RawColumn::new("V", vec![CellValue::Float(3.7), CellValue::Float(3.8)]),
            RawColumn::new("I", vec![CellValue::Float(1.0), CellValue::Missing]),
        ])
        .unwrap();
        assert_eq!(table.shape(), DataShape { rows: 2, columns: 2 });
        assert_eq!(table.shape().to_string(), "(2, 2)");
        assert!(RawTable::default().is_empty());
    }

    #[test]
    fn values_serialize_untagged() {
        let values = vec![
            CellValue::Integer(1),
            CellValue::Float(0.5),
            CellValue::Missing,
            CellValue::Text("x".to_string()),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[1,0.5,null,"x"]"#);
    }
}
