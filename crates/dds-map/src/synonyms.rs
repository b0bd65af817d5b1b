//! Precomputed lexical terms for every canonical field.

use std::collections::BTreeSet;

use dds_model::{CanonicalField, CanonicalSchema};

use crate::normalize::{normalize_text, padded_phrase, token_set};

/// Normalized forms of one canonical field and its synonyms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTerms {
    key: String,
    normalized: String,
    tokens: BTreeSet<String>,
    phrases: Vec<String>,
}

impl FieldTerms {
    pub fn new<S: AsRef<str>>(key: &str, synonyms: &[S]) -> Self {
        let normalized = normalize_text(key);
        let mut phrases: Vec<String> = Vec::with_capacity(synonyms.len() + 1);
        let terms = std::iter::once(normalized.clone())
            .chain(synonyms.iter().map(|synonym| normalize_text(synonym.as_ref())));
        for term in terms {
            if term.is_empty() {
                continue;
            }
            let words: Vec<&str> = term.split(' ').collect();
            let phrase = padded_phrase(&words);
            if !phrases.contains(&phrase) {
                phrases.push(phrase);
            }
        }
        Self {
            key: key.to_string(),
            normalized,
            tokens: token_set(key),
            phrases,
        }
    }

    pub fn from_field(field: &CanonicalField) -> Self {
        Self::new(field.key(), field.synonyms())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Normalized field key, e.g. `voltage v`.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Word tokens of the field key.
    pub fn tokens(&self) -> &BTreeSet<String> {
        &self.tokens
    }

    /// Space-padded normalized key and synonyms.
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// True when a term and the padded input phrase contain one another.
    pub fn matches_phrase(&self, input_phrase: &str) -> bool {
        self.phrases
            .iter()
            .any(|term| input_phrase.contains(term.as_str()) || term.contains(input_phrase))
    }
}

/// Synonym terms for every field of a schema, in schema order.
///
/// Built once and shared read-only between scorers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynonymTable {
    fields: Vec<FieldTerms>,
}

impl SynonymTable {
    pub fn from_schema(schema: &CanonicalSchema) -> Self {
        Self {
            fields: schema.fields().iter().map(FieldTerms::from_field).collect(),
        }
    }

    pub fn fields(&self) -> &[FieldTerms] {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&FieldTerms> {
        self.fields.iter().find(|terms| terms.key == key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
