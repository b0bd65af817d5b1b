use std::collections::BTreeMap;

use dds_model::{CanonicalSchema, CellRecord, CellValue, CycleRecord, CyclingProtocol, RecordError};

#[test]
fn record_survives_json_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cell.json");

    let mut record = CellRecord::new("LFP-01");
    record.cathode_material = Some("LFP".to_string());
    record.nominal_capacity_ah = Some(1.1);
    record.charge_protocol.push(CyclingProtocol {
        c_rate: Some(0.5),
        ..Default::default()
    });
    let mut cycle = CycleRecord::new(1);
    cycle.voltage_v = Some(vec![3.2, 3.3, 3.4]);
    cycle.internal_resistance_ohm = Some(0.018);
    record.cycles.push(cycle);

    record.save_json(&path).expect("save record");
    let loaded = CellRecord::load_json(&path).expect("load record");
    assert_eq!(loaded, record);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.json");
    let err = CellRecord::load_json(&path).unwrap_err();
    match err {
        RecordError::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_json_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").expect("write file");
    assert!(matches!(
        CellRecord::load_json(&path),
        Err(RecordError::Json(_))
    ));
}

#[test]
fn unknown_schema_fields_are_kept_raw() {
    use dds_model::{CanonicalField, FieldGroup, FieldKind};

    let mut fields = CanonicalSchema::battery().fields().to_vec();
    fields.push(CanonicalField::new(
        "power_w",
        FieldGroup::Cycle,
        FieldKind::FloatSeries,
        ["power"],
    ));
    fields.push(CanonicalField::new(
        "operator",
        FieldGroup::Cell,
        FieldKind::Text,
        ["operator"],
    ));
    let schema = CanonicalSchema::new(fields).expect("schema");

    let mut data = BTreeMap::new();
    data.insert(
        "power_w".to_string(),
        vec![CellValue::Float(4.2), CellValue::Missing],
    );
    data.insert(
        "operator".to_string(),
        vec![CellValue::Text("lab-3".to_string())],
    );
    let record = CellRecord::from_fields(&data, Some("x"), &schema).expect("record");

    assert_eq!(record.cycles.len(), 1);
    assert_eq!(
        record.cycles[0].additional_data["power_w"],
        vec![CellValue::Float(4.2), CellValue::Missing]
    );
    assert_eq!(
        record.extra["operator"],
        vec![CellValue::Text("lab-3".to_string())]
    );
}
