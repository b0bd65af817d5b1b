//! Plain-text mapping report.

use std::fmt::Write as _;

use dds_model::{MappingSource, StandardizationResult};

use crate::suggest::{ColumnSuggestions, FieldSuggestion};

/// Render the mapping report for one standardization run.
///
/// `suggestions` must hold one entry per input column in input order; it
/// drives the column listing. Unmapped columns always list their top
/// candidates. Mapped columns list alternatives when `show_alternatives`.
pub fn render(
    source: &str,
    result: &StandardizationResult,
    suggestions: &[ColumnSuggestions],
    show_alternatives: bool,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Data Standardization Report for {source} ===");
    let _ = writeln!(out, "Data shape: {}", result.raw_data_shape);
    let _ = writeln!(out, "Raw columns: {}", result.raw_data_shape.columns);
    let _ = writeln!(out, "Mapped columns: {}", result.mapped_count());
    let _ = writeln!(out, "Unmapped columns: {}", result.unmapped_count());

    let _ = writeln!(out);
    let _ = writeln!(out, "=== Column Mapping Results ===");
    for column in suggestions {
        match result.mapping_used.get(&column.column) {
            Some(entry) => {
                match entry.source {
                    MappingSource::Custom => {
                        let _ = writeln!(
                            out,
                            "✓ '{}' → '{}' (custom, score: {:.3})",
                            entry.column, entry.field, entry.score
                        );
                    }
                    MappingSource::Automatic => {
                        let _ = writeln!(
                            out,
                            "✓ '{}' → '{}' (score: {:.3})",
                            entry.column, entry.field, entry.score
                        );
                    }
                }
                if show_alternatives {
                    let alternatives: Vec<&FieldSuggestion> = column
                        .candidates
                        .iter()
                        .filter(|candidate| candidate.field != entry.field)
                        .collect();
                    if !alternatives.is_empty() {
                        let _ = writeln!(out, "    Alternatives: {}", join(&alternatives));
                    }
                }
            }
            None => {
                let best = column.best().map_or(0.0, |candidate| candidate.score);
                let _ = writeln!(
                    out,
                    "✗ '{}' → [UNMAPPED] (best score: {best:.3})",
                    column.column
                );
                let candidates: Vec<&FieldSuggestion> = column.candidates.iter().collect();
                if !candidates.is_empty() {
                    let _ = writeln!(out, "    Top suggestions: {}", join(&candidates));
                }
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "=== Unmapped Columns ({}) ===", result.unmapped_count());
    for column in &result.unmapped_columns {
        let _ = writeln!(out, "- {column}");
    }
    out
}

fn join(candidates: &[&FieldSuggestion]) -> String {
    candidates
        .iter()
        .map(|candidate| {
            format!(
                "{} ({:.3}, {})",
                candidate.field,
                candidate.score,
                candidate.confidence.label()
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}
