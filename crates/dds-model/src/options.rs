//! Caller options for standardization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::schema::CanonicalSchema;

/// Minimum score an automatic mapping must reach by default.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Default number of suggestions listed per column.
pub const DEFAULT_TOP_K: usize = 3;

/// Acceptance rule applied by the mapping resolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptPolicy {
    /// Accept candidates scoring at or above the threshold.
    Threshold(f64),
    /// Accept any candidate regardless of score.
    Force,
}

impl AcceptPolicy {
    pub fn accepts(&self, score: f64) -> bool {
        match self {
            AcceptPolicy::Threshold(threshold) => score >= *threshold,
            AcceptPolicy::Force => true,
        }
    }
}

/// Options controlling one standardization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardizeOptions {
    /// Minimum similarity score for automatic mappings, in [0, 1].
    pub threshold: f64,

    /// Map every column to its best free field, ignoring the threshold.
    pub force_all: bool,

    /// Number of suggestions per column in reports.
    pub top_k: usize,

    /// Manual `column -> field` assignments that bypass scoring.
    pub custom_mapping: Option<BTreeMap<String, String>>,
}

impl Default for StandardizeOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            force_all: false,
            top_k: DEFAULT_TOP_K,
            custom_mapping: None,
        }
    }
}

impl StandardizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_force_all(mut self, force_all: bool) -> Self {
        self.force_all = force_all;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_custom_mapping(mut self, mapping: BTreeMap<String, String>) -> Self {
        self.custom_mapping = Some(mapping);
        self
    }

    /// Acceptance rule derived from `force_all` and `threshold`.
    pub fn policy(&self) -> AcceptPolicy {
        if self.force_all {
            AcceptPolicy::Force
        } else {
            AcceptPolicy::Threshold(self.threshold)
        }
    }

    /// Check options against a schema before any scoring runs.
    pub fn validate(&self, schema: &CanonicalSchema) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        if self.top_k == 0 {
            return Err(ConfigError::InvalidTopK);
        }
        let Some(custom) = &self.custom_mapping else {
            return Ok(());
        };
        let mut targets: BTreeMap<&str, &str> = BTreeMap::new();
        for (column, field) in custom {
            if !schema.contains(field) {
                return Err(ConfigError::UnknownField {
                    column: column.clone(),
                    field: field.clone(),
                });
            }
            if let Some(first) = targets.insert(field.as_str(), column.as_str()) {
                return Err(ConfigError::DuplicateTarget {
                    field: field.clone(),
                    first: first.to_string(),
                    second: column.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(column, field)| (column.to_string(), field.to_string()))
            .collect()
    }

    #[test]
    fn defaults() {
        let options = StandardizeOptions::default();
        assert_eq!(options.threshold, 0.3);
        assert_eq!(options.top_k, 3);
        assert!(!options.force_all);
        assert_eq!(options.policy(), AcceptPolicy::Threshold(0.3));
        assert!(options.validate(&CanonicalSchema::battery()).is_ok());
    }

    #[test]
    fn force_all_overrides_threshold() {
        let options = StandardizeOptions::new()
            .with_threshold(0.9)
            .with_force_all(true);
        assert_eq!(options.policy(), AcceptPolicy::Force);
        assert!(options.policy().accepts(0.0));
        assert!(!AcceptPolicy::Threshold(0.9).accepts(0.89));
    }

    #[test]
    fn rejects_bad_threshold() {
        let schema = CanonicalSchema::battery();
        for threshold in [-0.1, 1.5, f64::NAN] {
            let options = StandardizeOptions::new().with_threshold(threshold);
            assert!(matches!(
                options.validate(&schema),
                Err(ConfigError::InvalidThreshold(_))
            ));
        }
    }

    #[test]
    fn rejects_zero_top_k() {
        let options = StandardizeOptions::new().with_top_k(0);
        assert_eq!(
            options.validate(&CanonicalSchema::battery()),
            Err(ConfigError::InvalidTopK)
        );
    }

    #[test]
    fn rejects_unknown_custom_field() {
        let options =
            StandardizeOptions::new().with_custom_mapping(custom(&[("P", "power_w")]));
        assert_eq!(
            options.validate(&CanonicalSchema::battery()),
            Err(ConfigError::UnknownField {
                column: "P".to_string(),
                field: "power_w".to_string(),
            })
        );
    }

    #[test]
    fn rejects_duplicate_custom_target() {
        let options = StandardizeOptions::new()
            .with_custom_mapping(custom(&[("U", "voltage_v"), ("Volt", "voltage_v")]));
        assert_eq!(
            options.validate(&CanonicalSchema::battery()),
            Err(ConfigError::DuplicateTarget {
                field: "voltage_v".to_string(),
                first: "U".to_string(),
                second: "Volt".to_string(),
            })
        );
    }
}
