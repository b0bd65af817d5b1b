use std::fs;
use std::path::PathBuf;

use dds_ingest::{IngestError, load_custom_mapping, read_delimited, read_table};
use dds_model::CellValue;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

#[test]
fn reads_csv_with_typed_values() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(
        &dir,
        "cell.csv",
        "Cycle_Index,Voltage (V),Step\n1,3.71,CC\n2,,CV\n",
    );

    let table = read_table(&path).expect("read csv");

    assert_eq!(table.column_names(), vec!["Cycle_Index", "Voltage (V)", "Step"]);
    assert_eq!(table.shape().rows, 2);
    let voltage = table.column("Voltage (V)").expect("voltage");
    assert_eq!(voltage.values, vec![CellValue::Float(3.71), CellValue::Missing]);
    let cycles = table.column("Cycle_Index").expect("cycles");
    assert_eq!(cycles.values, vec![CellValue::Integer(1), CellValue::Integer(2)]);
}

#[test]
fn tsv_always_splits_on_tab() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "cell.tsv", "Time, s\tVoltage, V\n0\t3.6\n");

    let table = read_table(&path).expect("read tsv");

    assert_eq!(table.column_names(), vec!["Time, s", "Voltage, V"]);
}

#[test]
fn text_delimiter_is_sniffed() {
    let dir = TempDir::new().expect("temp dir");
    let semicolon = write(&dir, "a.txt", "time;voltage\n0;3.6\n");
    let space = write(&dir, "b.txt", "time voltage\n0 3.6\n");
    let comma = write(&dir, "c.TXT", "Voltage (V),Current (A)\n3.6,1\n");

    assert_eq!(
        read_table(&semicolon).expect("semicolon").column_names(),
        vec!["time", "voltage"]
    );
    assert_eq!(
        read_table(&space).expect("space").column_names(),
        vec!["time", "voltage"]
    );
    assert_eq!(
        read_table(&comma).expect("comma").column_names(),
        vec!["Voltage (V)", "Current (A)"]
    );
}

#[test]
fn bom_and_duplicate_headers() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "dup.csv", "\u{feff}Voltage,Voltage,\n1,2,3\n");

    let table = read_table(&path).expect("read");

    assert_eq!(table.column_names(), vec!["Voltage", "Voltage.1", "Unnamed: 2"]);
}

#[test]
fn explicit_delimiter_ignores_extension() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "data.dat", "a|b\n1|2\n");

    let table = read_delimited(&path, b'|').expect("read");

    assert_eq!(table.column_names(), vec!["a", "b"]);
}

#[test]
fn empty_file_gives_empty_table() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "empty.csv", "");

    let table = read_table(&path).expect("read");

    assert!(table.is_empty());
}

#[test]
fn unsupported_and_missing_files_are_errors() {
    let dir = TempDir::new().expect("temp dir");
    let excel = write(&dir, "cell.xlsx", "not really excel");

    assert!(matches!(
        read_table(&excel),
        Err(IngestError::UnsupportedFormat { .. })
    ));
    assert!(matches!(
        read_table(&dir.path().join("absent.csv")),
        Err(IngestError::FileNotFound { .. })
    ));
}

#[test]
fn loads_mapping_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(
        &dir,
        "mapping.json",
        r#"{"Ecell/V": "voltage_v", "Col_B": "cell_id"}"#,
    );

    let mapping = load_custom_mapping(&path).expect("mapping");

    assert_eq!(mapping.len(), 2);
    assert_eq!(mapping["Ecell/V"], "voltage_v");
}

#[test]
fn mapping_file_must_be_string_object() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "bad.json", r#"{"Ecell/V": 3}"#);

    assert!(matches!(
        load_custom_mapping(&path),
        Err(IngestError::MappingParse { .. })
    ));
}

#[test]
fn missing_mapping_file_is_not_found() {
    let dir = TempDir::new().expect("temp dir");

    assert!(matches!(
        load_custom_mapping(&dir.path().join("absent.json")),
        Err(IngestError::FileNotFound { .. })
    ));
}
