//! Column-to-field mapping engine.
//!
//! Scores input column names against the canonical schema, resolves a
//! one-to-one mapping, produces per-column suggestions and standardizes
//! raw tables into canonical results and records.

pub mod normalize;
pub mod report;
pub mod resolve;
pub mod score;
pub mod standardize;
pub mod suggest;
pub mod synonyms;

pub use normalize::{normalize_text, tokenize};
pub use resolve::{Resolution, resolve};
pub use score::{ScoreMatrix, ScoreWeights, SimilarityResult, SimilarityScorer, similarity};
pub use standardize::Standardizer;
pub use suggest::{ColumnSuggestions, ConfidenceLevel, FieldSuggestion, suggest};
pub use synonyms::{FieldTerms, SynonymTable};
