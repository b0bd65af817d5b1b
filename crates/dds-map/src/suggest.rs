//! Top-K field suggestions per column.

use serde::Serialize;

use crate::score::ScoreMatrix;

/// Confidence band of a suggestion score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ConfidenceLevel {
    /// Score of 0.4 or below.
    Low,
    /// Score above 0.4 and up to 0.7.
    Medium,
    /// Score above 0.7.
    High,
}

impl ConfidenceLevel {
    const HIGH_ABOVE: f64 = 0.7;
    const MEDIUM_ABOVE: f64 = 0.4;

    pub fn from_score(score: f64) -> Self {
        if score > Self::HIGH_ABOVE {
            Self::High
        } else if score > Self::MEDIUM_ABOVE {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Short tag shown in tables.
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MED",
            Self::Low => "LOW",
        }
    }
}

/// One candidate field for a column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSuggestion {
    pub field: String,
    pub score: f64,
    pub confidence: ConfidenceLevel,
}

/// Ranked candidates for one input column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSuggestions {
    pub column: String,
    pub candidates: Vec<FieldSuggestion>,
}

impl ColumnSuggestions {
    pub fn best(&self) -> Option<&FieldSuggestion> {
        self.candidates.first()
    }
}

/// Up to `top_k` fields per column, by descending score with ties broken by
/// field key. No threshold or uniqueness is applied.
pub fn suggest(matrix: &ScoreMatrix, top_k: usize) -> Vec<ColumnSuggestions> {
    matrix
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let row = matrix.row(idx);
            let mut order: Vec<usize> = (0..row.len()).collect();
            order.sort_by(|&a, &b| {
                row[b]
                    .score
                    .total_cmp(&row[a].score)
                    .then_with(|| row[a].field.cmp(&row[b].field))
            });
            let candidates = order
                .into_iter()
                .take(top_k)
                .map(|field| FieldSuggestion {
                    field: row[field].field.clone(),
                    score: row[field].score,
                    confidence: ConfidenceLevel::from_score(row[field].score),
                })
                .collect();
            ColumnSuggestions {
                column: column.clone(),
                candidates,
            }
        })
        .collect()
}
