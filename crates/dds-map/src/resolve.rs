//! One-to-one column-to-field resolution.
//!
//! Columns propose to fields in preference order (deferred acceptance). A
//! field held by one column is taken over only by a strictly higher score,
//! or by an equal score from a column earlier in the input. Displaced
//! columns continue with their next candidate, so a column never settles
//! for a worse field while a better one is free.

use std::collections::VecDeque;

use dds_model::{AcceptPolicy, MappedColumn, Mapping, MappingSource};
use tracing::{debug, trace};

use crate::score::ScoreMatrix;

/// Outcome of resolving a score matrix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Accepted assignments in input column order.
    pub mapping: Mapping,
    /// Columns without an acceptable free field, in input order.
    pub unmapped_columns: Vec<String>,
}

/// Resolve a score matrix into a one-to-one mapping.
///
/// Deterministic for a given matrix and policy. Duplicate column names are
/// treated as independent columns.
pub fn resolve(matrix: &ScoreMatrix, policy: AcceptPolicy) -> Resolution {
    let column_count = matrix.columns().len();
    let preferences: Vec<Vec<usize>> = (0..column_count).map(|idx| matrix.ranked(idx)).collect();
    let mut next_choice = vec![0usize; column_count];
    let mut holder: Vec<Option<usize>> = vec![None; matrix.fields().len()];
    let mut queue: VecDeque<usize> = (0..column_count).collect();

    while let Some(column) = queue.pop_front() {
        while let Some(&field) = preferences[column].get(next_choice[column]) {
            next_choice[column] += 1;
            let candidate = matrix.get(column, field);
            if !policy.accepts(candidate.score) {
                // Remaining candidates score no higher.
                next_choice[column] = preferences[column].len();
                break;
            }
            let current_holder = holder[field];
            match current_holder {
                None => {
                    holder[field] = Some(column);
                    break;
                }
                Some(current) => {
                    let held = matrix.get(current, field).score;
                    let wins = candidate.score > held || (candidate.score == held && column < current);
                    trace!(
                        column = %candidate.column,
                        field = %candidate.field,
                        score = candidate.score,
                        held,
                        wins,
                        "field contested"
                    );
                    if wins {
                        holder[field] = Some(column);
                        queue.push_back(current);
                        break;
                    }
                }
            }
        }
    }

    let mut assigned: Vec<Option<usize>> = vec![None; column_count];
    for (field, column) in holder.iter().enumerate() {
        if let Some(column) = column {
            assigned[*column] = Some(field);
        }
    }

    let mut resolution = Resolution::default();
    for (column, field) in assigned.into_iter().enumerate() {
        let name = &matrix.columns()[column];
        match field {
            Some(field) => {
                let chosen = matrix.get(column, field);
                debug!(column = %name, field = %chosen.field, score = chosen.score, "column mapped");
                resolution.mapping.insert(MappedColumn {
                    column: name.clone(),
                    field: chosen.field.clone(),
                    score: chosen.score,
                    source: MappingSource::Automatic,
                });
            }
            None => {
                debug!(column = %name, "column unmapped");
                resolution.unmapped_columns.push(name.clone());
            }
        }
    }
    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use dds_model::CanonicalSchema;

    use crate::score::SimilarityScorer;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn resolve_names(names: &[&str], policy: AcceptPolicy) -> Resolution {
        let scorer = SimilarityScorer::for_schema(&CanonicalSchema::battery());
        resolve(&scorer.matrix(&columns(names)), policy)
    }

    #[test]
    fn empty_input_resolves_to_nothing() {
        let resolution = resolve_names(&[], AcceptPolicy::Threshold(0.3));
        assert!(resolution.mapping.is_empty());
        assert!(resolution.unmapped_columns.is_empty());
    }

    #[test]
    fn stronger_column_keeps_contested_field() {
        let resolution = resolve_names(&["Volt", "Voltage"], AcceptPolicy::Threshold(0.3));
        assert_eq!(resolution.mapping.field_for("Voltage"), Some("voltage_v"));
        assert_eq!(resolution.mapping.field_for("Volt"), None);
        assert_eq!(resolution.unmapped_columns, vec!["Volt".to_string()]);
    }

    #[test]
    fn equal_scores_favor_earlier_column() {
        let resolution = resolve_names(&["Volts", "Volts"], AcceptPolicy::Threshold(0.3));
        assert_eq!(resolution.mapping.len(), 1);
        assert_eq!(resolution.unmapped_columns.len(), 1);
        let entry = resolution.mapping.iter().next().unwrap();
        assert_eq!(entry.field, "voltage_v");
    }

    #[test]
    fn force_maps_loser_elsewhere() {
        let resolution = resolve_names(&["Volt", "Voltage"], AcceptPolicy::Force);
        assert_eq!(resolution.mapping.len(), 2);
        assert_eq!(resolution.mapping.field_for("Voltage"), Some("voltage_v"));
        assert!(resolution.unmapped_columns.is_empty());
    }

    #[test]
    fn mapping_follows_input_order() {
        let resolution = resolve_names(&["Time", "Current", "Voltage"], AcceptPolicy::Threshold(0.3));
        let order: Vec<&str> = resolution
            .mapping
            .iter()
            .map(|entry| entry.column.as_str())
            .collect();
        assert_eq!(order, vec!["Time", "Current", "Voltage"]);
    }

    #[test]
    fn force_assigns_zero_score_columns_by_key() {
        let resolution = resolve_names(&["", "###"], AcceptPolicy::Force);
        assert_eq!(resolution.mapping.field_for(""), Some("anode_material"));
        assert_eq!(resolution.mapping.field_for("###"), Some("cathode_material"));
    }
}
