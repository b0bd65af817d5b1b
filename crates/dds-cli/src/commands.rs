use std::fs::{self, File};
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, info_span};

use dds_ingest::{load_custom_mapping, read_table};
use dds_map::{ColumnSuggestions, Standardizer};
use dds_model::{CanonicalSchema, CellRecord, StandardizationResult, StandardizeOptions};

use crate::cli::{StandardizeArgs, SuggestArgs};
use crate::summary::print_suggestions;

/// File name of the saved report, written next to the record.
pub const REPORT_FILE_NAME: &str = "mapping_report.txt";

/// Everything produced by one `standardize` run.
#[derive(Debug)]
pub struct StandardizeOutcome {
    pub input: PathBuf,
    pub result: StandardizationResult,
    pub record: Option<CellRecord>,
    pub report: String,
    pub record_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub result_path: Option<PathBuf>,
}

pub fn run_fields() -> CanonicalSchema {
    CanonicalSchema::battery()
}

pub fn run_suggest(args: &SuggestArgs) -> Result<Vec<ColumnSuggestions>> {
    let table = read_table(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;
    anyhow::ensure!(args.top_k > 0, "--top-k must be at least 1");
    let standardizer = Standardizer::default();
    Ok(standardizer.suggest(&table.column_names(), args.top_k))
}

/// Run `standardize`. The report is printed when `show_report` is set or
/// `--report-only` was given.
pub fn run_standardize(args: &StandardizeArgs, show_report: bool) -> Result<StandardizeOutcome> {
    let span = info_span!("standardize_file", input = %args.input.display());
    let _guard = span.enter();

    let table = read_table(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;
    let mut options = StandardizeOptions::new()
        .with_threshold(args.threshold)
        .with_force_all(args.force_all)
        .with_top_k(args.top_k);
    if let Some(path) = &args.mapping {
        let custom = load_custom_mapping(path)
            .with_context(|| format!("load mapping {}", path.display()))?;
        options = options.with_custom_mapping(custom);
    }

    let standardizer = Standardizer::default();
    let result = standardizer
        .standardize(&table, &options)
        .context("standardize columns")?;
    let source = source_name(&args.input);
    let report = standardizer.report(&source, &table, &result, options.top_k, args.suggestions);

    if show_report || args.report_only {
        println!("{report}");
    }
    if args.suggestions {
        print_suggestions(&standardizer.suggest(&table.column_names(), options.top_k));
    }

    let mut outcome = StandardizeOutcome {
        input: args.input.clone(),
        result,
        record: None,
        report,
        record_path: None,
        report_path: None,
        result_path: None,
    };

    if !args.report_only {
        let cell_id = args.cell_id.clone().unwrap_or_else(|| cell_id_from_path(&args.input));
        let record = standardizer
            .build_record(&outcome.result, Some(&cell_id))
            .context("build cell record")?;
        ensure_parent(&args.output)?;
        record
            .save_json(&args.output)
            .with_context(|| format!("write record {}", args.output.display()))?;
        info!(
            cell_id = %record.cell_id,
            cycles = record.cycle_count(),
            path = %args.output.display(),
            "cell record written"
        );
        outcome.record = Some(record);
        outcome.record_path = Some(args.output.clone());
    }

    if args.save_report {
        let path = report_path(&args.output);
        ensure_parent(&path)?;
        fs::write(&path, &outcome.report)
            .with_context(|| format!("write report {}", path.display()))?;
        debug!(path = %path.display(), "mapping report written");
        outcome.report_path = Some(path);
    }

    if let Some(path) = &args.result_json {
        write_result_json(&outcome.result, path)?;
        outcome.result_path = Some(path.clone());
    }

    Ok(outcome)
}

/// Location of the saved report for a given record path.
pub fn report_path(output: &Path) -> PathBuf {
    match output.parent() {
        Some(parent) => parent.join(REPORT_FILE_NAME),
        None => PathBuf::from(REPORT_FILE_NAME),
    }
}

fn write_result_json(result: &StandardizationResult, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, result)
        .with_context(|| format!("write result {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flush result {}", path.display()))?;
    debug!(path = %path.display(), "standardization result written");
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    Ok(())
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn cell_id_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| dds_model::UNKNOWN_CELL_ID.to_string())
}
