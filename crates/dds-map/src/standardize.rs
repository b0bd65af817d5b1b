//! Standardization of raw tables onto the canonical schema.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use dds_model::{
    AcceptPolicy, CanonicalSchema, CellRecord, ConfigError, MappedColumn, Mapping, MappingSource,
    RawTable, RecordError, StandardizationResult, StandardizeOptions,
};
use tracing::{debug, info, info_span, warn};

use crate::report;
use crate::resolve::{Resolution, resolve};
use crate::score::{ScoreMatrix, ScoreWeights, SimilarityScorer};
use crate::suggest::{ColumnSuggestions, suggest};
use crate::synonyms::SynonymTable;

/// Maps raw tables onto a canonical schema.
///
/// Holds only read-only state, so one instance can serve any number of
/// concurrent calls.
#[derive(Debug, Clone)]
pub struct Standardizer {
    schema: Arc<CanonicalSchema>,
    scorer: SimilarityScorer,
}

impl Default for Standardizer {
    fn default() -> Self {
        Self::new(CanonicalSchema::battery())
    }
}

impl Standardizer {
    pub fn new(schema: CanonicalSchema) -> Self {
        let scorer = SimilarityScorer::for_schema(&schema);
        Self {
            schema: Arc::new(schema),
            scorer,
        }
    }

    /// Standardizer with custom scorer weights.
    pub fn with_weights(schema: CanonicalSchema, weights: ScoreWeights) -> Result<Self, ConfigError> {
        let synonyms = Arc::new(SynonymTable::from_schema(&schema));
        let scorer = SimilarityScorer::with_weights(synonyms, weights)?;
        Ok(Self {
            schema: Arc::new(schema),
            scorer,
        })
    }

    pub fn schema(&self) -> &CanonicalSchema {
        &self.schema
    }

    pub fn scorer(&self) -> &SimilarityScorer {
        &self.scorer
    }

    pub fn score_matrix(&self, columns: &[String]) -> ScoreMatrix {
        self.scorer.matrix(columns)
    }

    /// Automatic one-to-one mapping of `columns` onto every field.
    pub fn resolve(&self, columns: &[String], policy: AcceptPolicy) -> Resolution {
        resolve(&self.score_matrix(columns), policy)
    }

    pub fn suggest(&self, columns: &[String], top_k: usize) -> Vec<ColumnSuggestions> {
        suggest(&self.score_matrix(columns), top_k)
    }

    /// Map a table's columns onto canonical fields and regroup its data.
    ///
    /// Custom mapping entries are applied verbatim. The remaining columns are
    /// resolved against the fields the custom entries left free. Custom
    /// entries naming a column absent from the table are skipped.
    pub fn standardize(
        &self,
        table: &RawTable,
        options: &StandardizeOptions,
    ) -> Result<StandardizationResult, ConfigError> {
        let span = info_span!("standardize", columns = table.columns().len());
        let _guard = span.enter();

        options.validate(&self.schema)?;
        let shape = table.shape();
        if table.is_empty() {
            debug!("table has no columns");
            return Ok(StandardizationResult::empty(shape));
        }

        let custom = self.custom_assignments(table, options);
        let taken: BTreeSet<&str> = custom.values().map(String::as_str).collect();
        let remaining: Vec<String> = table
            .columns()
            .iter()
            .filter(|column| !custom.contains_key(column.name.as_str()))
            .map(|column| column.name.clone())
            .collect();
        let matrix = self
            .scorer
            .matrix_where(&remaining, |terms| !taken.contains(terms.key()));
        let automatic = resolve(&matrix, options.policy());

        let mut mapping = Mapping::new();
        let mut result = StandardizationResult::empty(shape);
        for column in table.columns() {
            let name = column.name.as_str();
            let entry = match custom.get(name) {
                Some(field) => Some(MappedColumn {
                    column: name.to_string(),
                    field: field.clone(),
                    score: 1.0,
                    source: MappingSource::Custom,
                }),
                None => automatic.mapping.get(name).cloned(),
            };
            match entry {
                Some(entry) => {
                    result
                        .standardized_data
                        .insert(entry.field.clone(), column.values.clone());
                    mapping.insert(entry);
                }
                None => {
                    result.unmapped_columns.push(name.to_string());
                    result
                        .unmapped_data
                        .insert(name.to_string(), column.values.clone());
                }
            }
        }
        result.mapping_used = mapping;

        info!(
            mapped = result.mapped_count(),
            unmapped = result.unmapped_count(),
            "standardization complete"
        );
        Ok(result)
    }

    /// Build a cell record from a standardization result.
    pub fn build_record(
        &self,
        result: &StandardizationResult,
        cell_id: Option<&str>,
    ) -> Result<CellRecord, RecordError> {
        CellRecord::from_result(result, cell_id, &self.schema)
    }

    /// Mapping report for a result produced from `table`.
    pub fn report(
        &self,
        source: &str,
        table: &RawTable,
        result: &StandardizationResult,
        top_k: usize,
        show_alternatives: bool,
    ) -> String {
        let suggestions = self.suggest(&table.column_names(), top_k);
        report::render(source, result, &suggestions, show_alternatives)
    }

    fn custom_assignments<'a>(
        &self,
        table: &RawTable,
        options: &'a StandardizeOptions,
    ) -> BTreeMap<&'a str, String> {
        let mut assignments = BTreeMap::new();
        let Some(custom) = &options.custom_mapping else {
            return assignments;
        };
        for (column, field) in custom {
            if table.column(column).is_none() {
                warn!(column = %column, field = %field, "custom mapping names a missing column");
                continue;
            }
            debug!(column = %column, field = %field, "custom mapping applied");
            assignments.insert(column.as_str(), field.clone());
        }
        assignments
    }
}
