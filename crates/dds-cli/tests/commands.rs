//! Integration tests for the CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use dds_cli::cli::{StandardizeArgs, SuggestArgs};
use dds_cli::commands::{REPORT_FILE_NAME, run_standardize, run_suggest};
use dds_cli::summary::{cycle_table, mapping_table};
use dds_model::{CellRecord, DEFAULT_THRESHOLD, DEFAULT_TOP_K, MappingSource};
use tempfile::TempDir;

const CYCLING_CSV: &str = "\
Cycle_Index,Test_Time(s),Voltage(V),Current(A),Notes
1,0,3.60,1.0,start
1,10,3.70,1.0,
1,20,3.80,1.0,
2,30,3.65,-1.0,
";

fn write_input(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write input");
    path
}

fn standardize_args(input: &Path, output: &Path) -> StandardizeArgs {
    StandardizeArgs {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        cell_id: None,
        threshold: DEFAULT_THRESHOLD,
        mapping: None,
        force_all: false,
        top_k: DEFAULT_TOP_K,
        report_only: false,
        suggestions: false,
        save_report: false,
        result_json: None,
    }
}

#[test]
fn standardize_writes_record_named_after_input() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_input(&dir, "cell_A1.csv", CYCLING_CSV);
    let output = dir.path().join("out").join("cell.json");

    let outcome = run_standardize(&standardize_args(&input, &output), false).expect("run");

    assert_eq!(outcome.record_path.as_deref(), Some(output.as_path()));
    let record = CellRecord::load_json(&output).expect("load record");
    assert_eq!(record.cell_id, "cell_A1");
    assert_eq!(record.cycles.len(), 1);
    assert_eq!(record.cycles[0].cycle_number, 1);
    assert_eq!(
        record.cycles[0].voltage_v,
        Some(vec![3.60, 3.70, 3.80, 3.65])
    );
    assert_eq!(Some(&record), outcome.record.as_ref());
    assert_eq!(outcome.result.mapping_used.field_for("Voltage(V)"), Some("voltage_v"));
    assert!(outcome.report_path.is_none());
}

#[test]
fn report_only_skips_record() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_input(&dir, "cell.csv", CYCLING_CSV);
    let output = dir.path().join("cell.json");
    let mut args = standardize_args(&input, &output);
    args.report_only = true;
    args.save_report = true;

    let outcome = run_standardize(&args, false).expect("run");

    assert!(outcome.record.is_none());
    assert!(!output.exists());
    let saved = fs::read_to_string(dir.path().join(REPORT_FILE_NAME)).expect("report");
    assert_eq!(saved, outcome.report);
    assert!(saved.contains("=== Data Standardization Report for cell.csv ==="));
}

#[test]
fn mapping_file_and_result_json() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_input(&dir, "run.csv", CYCLING_CSV);
    let mapping = write_input(&dir, "mapping.json", r#"{"Notes": "description"}"#);
    let output = dir.path().join("run.json");
    let result_json = dir.path().join("result.json");
    let mut args = standardize_args(&input, &output);
    args.mapping = Some(mapping);
    args.cell_id = Some("B7".to_string());
    args.result_json = Some(result_json.clone());

    let outcome = run_standardize(&args, false).expect("run");

    let entry = outcome.result.mapping_used.get("Notes").expect("custom entry");
    assert_eq!(entry.field, "description");
    assert_eq!(entry.source, MappingSource::Custom);
    let record = outcome.record.as_ref().expect("record");
    assert_eq!(record.cell_id, "B7");
    assert_eq!(record.description.as_deref(), Some("start"));

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&result_json).expect("result")).expect("json");
    assert_eq!(saved["mapping_used"]["Notes"], "description");
    assert_eq!(saved["raw_data_shape"]["rows"], 4);
}

#[test]
fn unknown_mapping_field_fails() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_input(&dir, "run.csv", CYCLING_CSV);
    let mapping = write_input(&dir, "mapping.json", r#"{"Notes": "no_such_field"}"#);
    let output = dir.path().join("run.json");
    let mut args = standardize_args(&input, &output);
    args.mapping = Some(mapping);

    let error = run_standardize(&args, false).unwrap_err();

    assert!(format!("{error:#}").contains("no_such_field"));
    assert!(!output.exists());
}

#[test]
fn missing_input_reports_path() {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("absent.csv");
    let output = dir.path().join("absent.json");

    let error = run_standardize(&standardize_args(&input, &output), false).unwrap_err();

    assert!(format!("{error:#}").contains("absent.csv"));
}

#[test]
fn suggest_ranks_candidates() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_input(&dir, "run.tsv", "Voltage\tTemp\n3.7\t25\n");

    let suggestions = run_suggest(&SuggestArgs {
        input,
        top_k: 2,
    })
    .expect("suggest");

    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0].column, "Voltage");
    assert_eq!(suggestions[0].candidates.len(), 2);
    assert_eq!(
        suggestions[0].best().map(|best| best.field.as_str()),
        Some("voltage_v")
    );
}

#[test]
fn summary_tables_render() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_input(&dir, "cell.csv", CYCLING_CSV);
    let output = dir.path().join("cell.json");

    let outcome = run_standardize(&standardize_args(&input, &output), false).expect("run");
    let record = outcome.record.as_ref().expect("record");

    let mapping = mapping_table(&outcome.result).to_string();
    assert!(mapping.contains("voltage_v"));
    assert!(mapping.contains("TOTAL"));
    let cycles = cycle_table(record).to_string();
    assert!(cycles.contains("1 cycles"));
}
