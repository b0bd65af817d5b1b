use std::collections::BTreeSet;

use dds_map::{SimilarityScorer, Standardizer, resolve};
use dds_model::{AcceptPolicy, CanonicalSchema};
use proptest::prelude::*;

fn vocabulary() -> Vec<String> {
    let schema = CanonicalSchema::battery();
    let mut words: Vec<String> = schema
        .fields()
        .iter()
        .flat_map(|field| field.synonyms().iter().cloned())
        .collect();
    words.extend(schema.keys().map(str::to_string));
    words
}

fn column_name() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vocabulary()),
        "[A-Za-z][A-Za-z0-9_ ()/]{0,14}",
    ]
}

#[test]
fn every_synonym_ranks_its_field_first() {
    let schema = CanonicalSchema::battery();
    let scorer = SimilarityScorer::for_schema(&schema);
    for field in schema.fields() {
        let names = field
            .synonyms()
            .iter()
            .cloned()
            .chain(std::iter::once(field.key().to_string()));
        for name in names {
            let matrix = scorer.matrix(std::slice::from_ref(&name));
            let best = matrix.ranked(0)[0];
            let result = matrix.get(0, best);
            assert_eq!(result.field, field.key(), "'{name}' ranked {}", result.field);
            assert!(result.score >= 0.9, "'{name}' scored {}", result.score);
        }
    }
}

#[test]
fn disjoint_names_score_low() {
    let scorer = SimilarityScorer::for_schema(&CanonicalSchema::battery());
    for name in ["xyzzy", "foobar", "qwerty", "lorem ipsum"] {
        for key in CanonicalSchema::battery().keys() {
            let result = scorer.score(name, key).expect("known field");
            assert!(result.score <= 0.15, "'{name}' vs {key}: {}", result.score);
        }
    }
}

proptest! {
    #[test]
    fn resolver_assigns_each_field_once(
        columns in prop::collection::vec(column_name(), 0..40),
        threshold in 0.0f64..=1.0,
    ) {
        let standardizer = Standardizer::default();
        let resolution = standardizer.resolve(&columns, AcceptPolicy::Threshold(threshold));
        let mut seen = BTreeSet::new();
        for entry in resolution.mapping.iter() {
            prop_assert!(seen.insert(entry.field.clone()), "field {} assigned twice", entry.field);
            prop_assert!(entry.score >= threshold);
        }
        prop_assert!(resolution.mapping.len() + resolution.unmapped_columns.len() == columns.len());
    }

    #[test]
    fn resolver_is_deterministic(columns in prop::collection::vec(column_name(), 0..30)) {
        let scorer = SimilarityScorer::for_schema(&CanonicalSchema::battery());
        let matrix = scorer.matrix(&columns);
        let first = resolve(&matrix, AcceptPolicy::Threshold(0.3));
        let second = resolve(&scorer.matrix(&columns), AcceptPolicy::Threshold(0.3));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn force_maps_every_column_when_fields_suffice(
        columns in prop::collection::vec(column_name(), 0..=23),
    ) {
        let standardizer = Standardizer::default();
        let resolution = standardizer.resolve(&columns, AcceptPolicy::Force);
        prop_assert!(resolution.unmapped_columns.is_empty());
        prop_assert_eq!(resolution.mapping.len(), columns.len());
    }
}
