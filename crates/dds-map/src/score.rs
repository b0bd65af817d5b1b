//! Similarity scoring for column-to-field mapping.
//!
//! A score combines three sub-scores in [0, 1]:
//! - sequence: Indel similarity (`2 * LCS / (|a| + |b|)`) of the normalized names
//! - token: Jaccard overlap of the word tokens
//! - semantic: 1.0 when the field key or one of its synonyms appears as a
//!   whole-token phrase in the column name, or the other way around
//!
//! The semantic weight dominates, so a column carrying an exact synonym
//! always outranks one that is merely spelled alike.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

use dds_model::{CanonicalSchema, ConfigError};
use rapidfuzz::distance::indel;
use serde::{Deserialize, Serialize};

use crate::normalize::{normalize_text, padded_phrase, tokenize};
use crate::synonyms::{FieldTerms, SynonymTable};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;
const MIN_SEMANTIC_WEIGHT: f64 = 0.9;

/// Relative weights of the three sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub semantic: f64,
    pub sequence: f64,
    pub token: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            semantic: 0.90,
            sequence: 0.05,
            token: 0.05,
        }
    }
}

impl ScoreWeights {
    /// Each weight must lie in [0, 1], the weights must sum to 1 and the
    /// semantic weight must be at least 0.9.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, weight) in [
            ("semantic", self.semantic),
            ("sequence", self.sequence),
            ("token", self.token),
        ] {
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(ConfigError::InvalidWeights(format!(
                    "{name} weight {weight} is outside [0, 1]"
                )));
            }
        }
        let sum = self.semantic + self.sequence + self.token;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::InvalidWeights(format!(
                "weights sum to {sum}, expected 1"
            )));
        }
        if self.semantic < MIN_SEMANTIC_WEIGHT {
            return Err(ConfigError::InvalidWeights(format!(
                "semantic weight {} is below {MIN_SEMANTIC_WEIGHT}",
                self.semantic
            )));
        }
        Ok(())
    }
}

/// Score of one column against one canonical field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityResult {
    pub column: String,
    pub field: String,
    /// Weighted score in [0, 1].
    pub score: f64,
    pub sequence: f64,
    pub token: f64,
    pub semantic: f64,
    /// Tokens shared by the column name and the field key.
    pub name_overlap: usize,
}

impl SimilarityResult {
    /// Human-readable breakdown of the score.
    pub fn explain(&self) -> String {
        format!(
            "score: {:.3}; semantic: {:.0}%; sequence: {:.0}%; token: {:.0}%",
            self.score,
            self.semantic * 100.0,
            self.sequence * 100.0,
            self.token * 100.0
        )
    }

    /// Candidate order: score, semantic hit, name token overlap, then key.
    pub fn preference(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.semantic.total_cmp(&self.semantic))
            .then_with(|| other.name_overlap.cmp(&self.name_overlap))
            .then_with(|| self.field.cmp(&other.field))
    }
}

/// Normalized forms of an input column name, computed once per column.
#[derive(Debug, Clone)]
struct ColumnTerms {
    normalized: String,
    tokens: BTreeSet<String>,
    phrase: Option<String>,
}

impl ColumnTerms {
    fn new(column: &str) -> Self {
        let ordered = tokenize(column);
        let phrase = (!ordered.is_empty()).then(|| padded_phrase(&ordered));
        Self {
            normalized: normalize_text(column),
            tokens: ordered.into_iter().collect(),
            phrase,
        }
    }
}

/// Scores columns against the fields of a synonym table.
#[derive(Debug, Clone)]
pub struct SimilarityScorer {
    synonyms: Arc<SynonymTable>,
    weights: ScoreWeights,
}

impl SimilarityScorer {
    pub fn new(synonyms: Arc<SynonymTable>) -> Self {
        Self {
            synonyms,
            weights: ScoreWeights::default(),
        }
    }

    pub fn for_schema(schema: &CanonicalSchema) -> Self {
        Self::new(Arc::new(SynonymTable::from_schema(schema)))
    }

    pub fn with_weights(
        synonyms: Arc<SynonymTable>,
        weights: ScoreWeights,
    ) -> Result<Self, ConfigError> {
        weights.validate()?;
        Ok(Self { synonyms, weights })
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    pub fn weights(&self) -> ScoreWeights {
        self.weights
    }

    /// Score a column against one field. `None` when the field is unknown.
    pub fn score(&self, column: &str, field: &str) -> Option<SimilarityResult> {
        let terms = self.synonyms.get(field)?;
        Some(self.compute(column, &ColumnTerms::new(column), terms))
    }

    /// Dense score matrix of `columns` against every field.
    pub fn matrix(&self, columns: &[String]) -> ScoreMatrix {
        self.matrix_where(columns, |_| true)
    }

    /// Score matrix restricted to the fields accepted by `keep`.
    pub fn matrix_where<F>(&self, columns: &[String], keep: F) -> ScoreMatrix
    where
        F: Fn(&FieldTerms) -> bool,
    {
        let fields: Vec<&FieldTerms> = self
            .synonyms
            .fields()
            .iter()
            .filter(|terms| keep(*terms))
            .collect();
        let mut cells = Vec::with_capacity(columns.len() * fields.len());
        for column in columns {
            let column_terms = ColumnTerms::new(column);
            for terms in &fields {
                cells.push(self.compute(column, &column_terms, terms));
            }
        }
        ScoreMatrix {
            columns: columns.to_vec(),
            fields: fields.iter().map(|terms| terms.key().to_string()).collect(),
            cells,
        }
    }

    fn compute(&self, column: &str, input: &ColumnTerms, field: &FieldTerms) -> SimilarityResult {
        let sequence = sequence_similarity(&input.normalized, field.normalized());
        let (token, name_overlap) = jaccard(&input.tokens, field.tokens());
        let semantic = match &input.phrase {
            Some(phrase) if field.matches_phrase(phrase) => 1.0,
            _ => 0.0,
        };
        let weighted = self.weights.semantic * semantic
            + self.weights.sequence * sequence
            + self.weights.token * token;
        SimilarityResult {
            column: column.to_string(),
            field: field.key().to_string(),
            score: weighted.clamp(0.0, 1.0),
            sequence,
            token,
            semantic,
            name_overlap,
        }
    }
}

/// Score one name against a field key and its synonyms with default weights.
pub fn similarity<S: AsRef<str>>(input: &str, field: &str, synonyms: &[S]) -> f64 {
    let scorer = SimilarityScorer::new(Arc::new(SynonymTable::default()));
    let terms = FieldTerms::new(field, synonyms);
    scorer.compute(input, &ColumnTerms::new(input), &terms).score
}

fn sequence_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    indel::normalized_similarity(a.chars(), b.chars())
}

fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> (f64, usize) {
    if a.is_empty() || b.is_empty() {
        return (0.0, 0);
    }
    let shared = a.intersection(b).count();
    let union = a.len() + b.len() - shared;
    (shared as f64 / union as f64, shared)
}

/// Row-major matrix of column-by-field scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    columns: Vec<String>,
    fields: Vec<String>,
    cells: Vec<SimilarityResult>,
}

impl ScoreMatrix {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn get(&self, column: usize, field: usize) -> &SimilarityResult {
        &self.cells[column * self.fields.len() + field]
    }

    /// Scores of one column against every field, in field order.
    pub fn row(&self, column: usize) -> &[SimilarityResult] {
        let width = self.fields.len();
        &self.cells[column * width..(column + 1) * width]
    }

    /// Field indices of one column, best candidate first.
    pub fn ranked(&self, column: usize) -> Vec<usize> {
        let row = self.row(column);
        let mut order: Vec<usize> = (0..row.len()).collect();
        order.sort_by(|&a, &b| row[a].preference(&row[b]));
        order
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> SimilarityScorer {
        SimilarityScorer::for_schema(&CanonicalSchema::battery())
    }

    fn candidate(field: &str, score: f64, semantic: f64, name_overlap: usize) -> SimilarityResult {
        SimilarityResult {
            column: "col".to_string(),
            field: field.to_string(),
            score,
            sequence: 0.0,
            token: 0.0,
            semantic,
            name_overlap,
        }
    }

    #[test]
    fn preference_breaks_ties_level_by_level() {
        let mut candidates = vec![
            candidate("a_low_score", 0.5, 1.0, 3),
            candidate("z_key", 0.9, 1.0, 2),
            candidate("b_no_semantic", 0.9, 0.0, 5),
            candidate("y_more_overlap", 0.9, 1.0, 3),
            candidate("c_key", 0.9, 1.0, 2),
        ];
        candidates.sort_by(SimilarityResult::preference);
        let order: Vec<&str> = candidates.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(
            order,
            vec!["y_more_overlap", "c_key", "z_key", "b_no_semantic", "a_low_score"]
        );
        assert_eq!(
            candidates[1].preference(&candidates[1]),
            Ordering::Equal
        );
    }

    #[test]
    fn ranked_falls_back_to_key_when_nothing_matches() {
        let scorer = scorer();
        let matrix = scorer.matrix(&["###".to_string()]);
        assert!(matrix.row(0).iter().all(|result| result.score == 0.0));
        let ranked: Vec<&str> = matrix
            .ranked(0)
            .into_iter()
            .map(|idx| matrix.fields()[idx].as_str())
            .collect();
        let mut keys = ranked.clone();
        keys.sort_unstable();
        assert_eq!(ranked, keys);
    }

    #[test]
    fn exact_synonym_scores_high() {
        let result = scorer().score("Voltage (V)", "voltage_v").unwrap();
        assert_eq!(result.semantic, 1.0);
        assert!(result.score >= 0.9, "got {}", result.score);
    }

    #[test]
    fn unrelated_name_scores_low() {
        let result = scorer().score("xyzzy", "voltage_v").unwrap();
        assert_eq!(result.semantic, 0.0);
        assert!(result.score <= 0.15, "got {}", result.score);
    }

    #[test]
    fn unknown_field_has_no_score() {
        assert!(scorer().score("Voltage", "power_w").is_none());
    }

    #[test]
    fn empty_name_scores_zero() {
        let result = scorer().score("  ", "time_s").unwrap();
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn free_function_uses_given_synonyms() {
        assert!(similarity("Ewe/V", "voltage_v", &["ewe"]) >= 0.9);
        assert!(similarity("Ewe/V", "voltage_v", &["potential"]) < 0.3);
    }

    #[test]
    fn weights_are_validated() {
        assert!(ScoreWeights::default().validate().is_ok());
        let low_semantic = ScoreWeights {
            semantic: 0.5,
            sequence: 0.25,
            token: 0.25,
        };
        assert!(matches!(
            low_semantic.validate(),
            Err(ConfigError::InvalidWeights(_))
        ));
        let bad_sum = ScoreWeights {
            semantic: 0.95,
            sequence: 0.05,
            token: 0.05,
        };
        assert!(bad_sum.validate().is_err());
    }

    #[test]
    fn ranked_prefers_semantic_match() {
        let matrix = scorer().matrix(&["Voltage".to_string()]);
        let best = matrix.ranked(0)[0];
        assert_eq!(matrix.fields()[best], "voltage_v");
    }

    #[test]
    fn explain_lists_components() {
        let result = scorer().score("Temp", "temperature_c").unwrap();
        let text = result.explain();
        assert!(text.contains("semantic: 100%"), "{text}");
    }
}
