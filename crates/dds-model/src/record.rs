//! Canonical cell and cycle records.
//!
//! A [`CellRecord`] is the structured form of a standardized table: cell
//! metadata plus one [`CycleRecord`] per cycle of measurements. Records are
//! persisted as JSON.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write as _};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::result::StandardizationResult;
use crate::schema::{CanonicalSchema, FieldGroup, FieldKind, keys};
use crate::table::CellValue;

/// Cell id used when neither the caller nor the data provides one.
pub const UNKNOWN_CELL_ID: &str = "unknown_cell";

/// Measurements of a single cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub cycle_number: i64,
    pub voltage_v: Option<Vec<f64>>,
    pub current_a: Option<Vec<f64>>,
    pub charge_capacity_ah: Option<Vec<f64>>,
    pub discharge_capacity_ah: Option<Vec<f64>>,
    pub time_s: Option<Vec<f64>>,
    pub temperature_c: Option<Vec<f64>>,
    pub internal_resistance_ohm: Option<f64>,
    /// Cycle-level fields outside the built-in set.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_data: BTreeMap<String, Vec<CellValue>>,
}

impl CycleRecord {
    pub fn new(cycle_number: i64) -> Self {
        Self {
            cycle_number,
            voltage_v: None,
            current_a: None,
            charge_capacity_ah: None,
            discharge_capacity_ah: None,
            time_s: None,
            temperature_c: None,
            internal_resistance_ohm: None,
            additional_data: BTreeMap::new(),
        }
    }

    /// Named series present in this cycle, in field order.
    pub fn series(&self) -> Vec<(&'static str, &[f64])> {
        [
            (keys::VOLTAGE_V, &self.voltage_v),
            (keys::CURRENT_A, &self.current_a),
            (keys::CHARGE_CAPACITY_AH, &self.charge_capacity_ah),
            (keys::DISCHARGE_CAPACITY_AH, &self.discharge_capacity_ah),
            (keys::TIME_S, &self.time_s),
            (keys::TEMPERATURE_C, &self.temperature_c),
        ]
        .into_iter()
        .filter_map(|(key, values)| values.as_deref().map(|values| (key, values)))
        .collect()
    }

    /// Point count of the cycle: voltage, else current, else time.
    pub fn data_points(&self) -> usize {
        [&self.voltage_v, &self.current_a, &self.time_s]
            .into_iter()
            .find_map(|values| values.as_ref().filter(|values| !values.is_empty()))
            .map_or(0, Vec::len)
    }
}

/// Charge or discharge protocol parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CyclingProtocol {
    pub c_rate: Option<f64>,
    pub current_a: Option<f64>,
    pub voltage_v: Option<f64>,
    pub power_w: Option<f64>,
    pub start_voltage_v: Option<f64>,
    pub start_soc: Option<f64>,
    pub end_voltage_v: Option<f64>,
    pub end_soc: Option<f64>,
}

/// One battery cell: metadata, protocols and cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    pub cell_id: String,
    pub cycles: Vec<CycleRecord>,
    pub form_factor: Option<String>,
    pub anode_material: Option<String>,
    pub cathode_material: Option<String>,
    pub electrolyte_material: Option<String>,
    pub nominal_capacity_ah: Option<f64>,
    pub depth_of_charge: f64,
    pub depth_of_discharge: f64,
    pub initial_cycles: i64,
    pub charge_protocol: Vec<CyclingProtocol>,
    pub discharge_protocol: Vec<CyclingProtocol>,
    pub max_voltage_limit_v: Option<f64>,
    pub min_voltage_limit_v: Option<f64>,
    pub max_current_limit_a: Option<f64>,
    pub min_current_limit_a: Option<f64>,
    pub reference: Option<String>,
    pub description: Option<String>,
    /// Cell-level fields outside the built-in set.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Vec<CellValue>>,
}

impl CellRecord {
    /// A record with every field at its default.
    pub fn new(cell_id: impl Into<String>) -> Self {
        Self {
            cell_id: cell_id.into(),
            cycles: Vec::new(),
            form_factor: None,
            anode_material: None,
            cathode_material: None,
            electrolyte_material: None,
            nominal_capacity_ah: None,
            depth_of_charge: 1.0,
            depth_of_discharge: 1.0,
            initial_cycles: 0,
            charge_protocol: Vec::new(),
            discharge_protocol: Vec::new(),
            max_voltage_limit_v: None,
            min_voltage_limit_v: None,
            max_current_limit_a: None,
            min_current_limit_a: None,
            reference: None,
            description: None,
            extra: BTreeMap::new(),
        }
    }

    /// Build a record from a standardization result.
    ///
    /// Cycle-level data becomes a single cycle when any cycle field other
    /// than `cycle_number` is present; cell-level data fills the metadata.
    /// Fields without data keep their defaults. A result with no columns or
    /// no rows is rejected with [`RecordError::EmptyInput`]. The cell id is `cell_id`
    /// when given, else the mapped `cell_id` value, else [`UNKNOWN_CELL_ID`].
    pub fn from_result(
        result: &StandardizationResult,
        cell_id: Option<&str>,
        schema: &CanonicalSchema,
    ) -> Result<Self, RecordError> {
        if result.is_empty() || result.raw_data_shape.rows == 0 {
            return Err(RecordError::EmptyInput);
        }
        Self::from_fields(&result.standardized_data, cell_id, schema)
    }

    /// Build a record from `field -> values` data.
    pub fn from_fields(
        data: &BTreeMap<String, Vec<CellValue>>,
        cell_id: Option<&str>,
        schema: &CanonicalSchema,
    ) -> Result<Self, RecordError> {
        let mut record = CellRecord::new(UNKNOWN_CELL_ID);
        let mut cycle = CycleRecord::new(1);
        let mut has_cycle_data = false;
        let mut mapped_id = None;

        for (key, values) in data {
            let key = key.as_str();
            let Some(field) = schema.get(key) else {
                continue;
            };
            let slot = Slot { key, values };
            match field.group() {
                FieldGroup::Cycle => {
                    if key != keys::CYCLE_NUMBER {
                        has_cycle_data = true;
                    }
                    fill_cycle(&mut cycle, &slot, field.kind())?;
                }
                FieldGroup::Cell if key == keys::CELL_ID => {
                    mapped_id = slot.text();
                }
                FieldGroup::Cell => fill_cell(&mut record, &slot, field.kind())?,
            }
        }

        record.cell_id = cell_id
            .map(str::to_string)
            .or(mapped_id)
            .unwrap_or_else(|| UNKNOWN_CELL_ID.to_string());
        if has_cycle_data {
            record.cycles.push(cycle);
        }
        Ok(record)
    }

    pub fn cycle_count(&self) -> usize {
        self.cycles.len()
    }

    pub fn total_data_points(&self) -> usize {
        self.cycles.iter().map(CycleRecord::data_points).sum()
    }

    /// Compute the requested derived features.
    pub fn features(&self, kinds: &[FeatureKind]) -> CellFeatures {
        let mut features = CellFeatures::default();
        if kinds.contains(&FeatureKind::CapacityFade) {
            features.capacity_fade = self.capacity_fade();
        }
        if kinds.contains(&FeatureKind::VoltageCurves) {
            let curves = self
                .cycles
                .iter()
                .take(VOLTAGE_CURVE_CYCLES)
                .filter_map(|cycle| {
                    let values = cycle.voltage_v.as_deref()?;
                    SeriesStats::from_values(values).map(|stats| VoltageCurve {
                        cycle_number: cycle.cycle_number,
                        stats,
                    })
                })
                .collect();
            features.voltage_curves = Some(curves);
        }
        if kinds.contains(&FeatureKind::TemperatureStats) {
            let temperatures: Vec<f64> = self
                .cycles
                .iter()
                .filter_map(|cycle| cycle.temperature_c.as_deref())
                .flatten()
                .copied()
                .collect();
            features.temperature = SeriesStats::from_values(&temperatures);
        }
        features
    }

    fn capacity_fade(&self) -> Option<CapacityFade> {
        let capacities: Vec<f64> = self
            .cycles
            .iter()
            .filter_map(|cycle| cycle.discharge_capacity_ah.as_deref()?.last().copied())
            .collect();
        let (&initial, &last) = (capacities.first()?, capacities.last()?);
        Some(CapacityFade {
            initial_capacity_ah: initial,
            final_capacity_ah: last,
            fade_rate_ah_per_cycle: (initial - last) / capacities.len() as f64,
            discharge_capacities_ah: capacities,
        })
    }

    /// Write the record as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<(), RecordError> {
        let file = File::create(path).map_err(|source| RecordError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(|source| RecordError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<Self, RecordError> {
        let file = File::open(path).map_err(|source| RecordError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Human-readable description: metadata, cycle count, point totals and
    /// details of the first, middle and last cycles.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Cell {}", self.cell_id);
        let _ = writeln!(out, "cycle count: {}", self.cycles.len());
        let _ = writeln!(out, "total data points: {}", self.total_data_points());

        let text_fields = [
            ("form_factor", &self.form_factor),
            ("anode_material", &self.anode_material),
            ("cathode_material", &self.cathode_material),
            ("electrolyte_material", &self.electrolyte_material),
            ("reference", &self.reference),
            ("description", &self.description),
        ];
        for (name, value) in text_fields {
            if let Some(value) = value {
                let _ = writeln!(out, "{name}: {value}");
            }
        }
        let float_fields = [
            ("nominal_capacity_ah", self.nominal_capacity_ah),
            ("depth_of_charge", Some(self.depth_of_charge)),
            ("depth_of_discharge", Some(self.depth_of_discharge)),
            ("max_voltage_limit_v", self.max_voltage_limit_v),
            ("min_voltage_limit_v", self.min_voltage_limit_v),
            ("max_current_limit_a", self.max_current_limit_a),
            ("min_current_limit_a", self.min_current_limit_a),
        ];
        for (name, value) in float_fields {
            if let Some(value) = value {
                let _ = writeln!(out, "{name}: {value}");
            }
        }
        let _ = writeln!(out, "initial_cycles: {}", self.initial_cycles);

        for (label, cycle) in sample_cycles(&self.cycles) {
            let _ = writeln!(out);
            let points = cycle.data_points();
            if points == 0 {
                let _ = writeln!(out, "Cycle {} ({label}) - no data points", cycle.cycle_number);
            } else {
                let _ = writeln!(
                    out,
                    "Cycle {} ({label}) - {points} data points",
                    cycle.cycle_number
                );
            }
            for (name, values) in cycle.series() {
                let _ = writeln!(
                    out,
                    "  {name} ({} points): {:?}",
                    values.len(),
                    sample_points(values)
                );
            }
            if let Some(resistance) = cycle.internal_resistance_ohm {
                let _ = writeln!(out, "  internal_resistance_ohm: {resistance}");
            }
        }
        if self.cycles.len() > 3 {
            let _ = writeln!(out, "\n... and {} cycles not shown", self.cycles.len() - 3);
        }
        out
    }
}

/// Derived quantities [`CellRecord::features`] can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// End-of-cycle discharge capacity and its fade.
    CapacityFade,
    /// Voltage statistics of the first cycles.
    VoltageCurves,
    /// Temperature statistics over all cycles.
    TemperatureStats,
}

impl FeatureKind {
    pub const ALL: [FeatureKind; 3] = [
        FeatureKind::CapacityFade,
        FeatureKind::VoltageCurves,
        FeatureKind::TemperatureStats,
    ];
}

/// Number of leading cycles summarized by [`FeatureKind::VoltageCurves`].
pub const VOLTAGE_CURVE_CYCLES: usize = 10;

/// Discharge capacity trend across cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityFade {
    pub initial_capacity_ah: f64,
    pub final_capacity_ah: f64,
    /// `(initial - final) / cycles with discharge data`.
    pub fade_rate_ah_per_cycle: f64,
    /// Last discharge capacity of each cycle that has one.
    pub discharge_capacities_ah: Vec<f64>,
}

/// Summary statistics of one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    pub max: f64,
    pub min: f64,
}

impl SeriesStats {
    /// `None` for an empty series.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let count = values.len() as f64;
        let mean = values.iter().sum::<f64>() / count;
        let variance = values
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>()
            / count;
        Some(Self {
            mean,
            std: variance.sqrt(),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
        })
    }
}

/// Voltage statistics of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoltageCurve {
    pub cycle_number: i64,
    #[serde(flatten)]
    pub stats: SeriesStats,
}

/// Features derived from a cell record.
///
/// A requested feature stays `None` when the record lacks the data for it,
/// except voltage curves, which are an empty list in that case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellFeatures {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_fade: Option<CapacityFade>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage_curves: Option<Vec<VoltageCurve>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<SeriesStats>,
}

fn sample_cycles(cycles: &[CycleRecord]) -> Vec<(&'static str, &CycleRecord)> {
    match cycles {
        [] => Vec::new(),
        [only] => vec![("first", only)],
        [first, last] => vec![("first", first), ("last", last)],
        [first, .., last] => vec![
            ("first", first),
            ("middle", &cycles[cycles.len() / 2]),
            ("last", last),
        ],
    }
}

// First two, middle and last two points.
fn sample_points(values: &[f64]) -> Vec<f64> {
    if values.len() <= 5 {
        return values.to_vec();
    }
    let n = values.len();
    vec![values[0], values[1], values[n / 2], values[n - 2], values[n - 1]]
}

/// Values of one field during record construction.
struct Slot<'a> {
    key: &'a str,
    values: &'a [CellValue],
}

impl Slot<'_> {
    fn first_present(&self) -> Option<&CellValue> {
        self.values.iter().find(|value| !value.is_missing())
    }

    fn mismatch(&self, expected: FieldKind, found: &CellValue) -> RecordError {
        RecordError::TypeMismatch {
            field: self.key.to_string(),
            expected,
            found: found.to_string(),
        }
    }

    fn series(&self) -> Result<Vec<f64>, RecordError> {
        self.values
            .iter()
            .filter(|value| !value.is_missing())
            .map(|value| {
                value
                    .as_f64()
                    .ok_or_else(|| self.mismatch(FieldKind::FloatSeries, value))
            })
            .collect()
    }

    fn float(&self) -> Result<Option<f64>, RecordError> {
        self.first_present()
            .map(|value| value.as_f64().ok_or_else(|| self.mismatch(FieldKind::Float, value)))
            .transpose()
    }

    fn integer(&self) -> Result<Option<i64>, RecordError> {
        self.first_present()
            .map(|value| {
                value
                    .as_i64()
                    .ok_or_else(|| self.mismatch(FieldKind::Integer, value))
            })
            .transpose()
    }

    fn text(&self) -> Option<String> {
        self.first_present().map(CellValue::to_string)
    }

    // Fields outside the built-in set are kept raw after a kind check.
    fn checked_raw(&self, kind: FieldKind) -> Result<Vec<CellValue>, RecordError> {
        match kind {
            FieldKind::FloatSeries => {
                self.series()?;
            }
            FieldKind::Float => {
                self.float()?;
            }
            FieldKind::Integer => {
                self.integer()?;
            }
            FieldKind::Text => {}
        }
        Ok(self.values.to_vec())
    }
}

fn fill_cycle(cycle: &mut CycleRecord, slot: &Slot<'_>, kind: FieldKind) -> Result<(), RecordError> {
    match slot.key {
        keys::CYCLE_NUMBER => {
            if let Some(number) = slot.integer()? {
                cycle.cycle_number = number;
            }
        }
        keys::VOLTAGE_V => cycle.voltage_v = Some(slot.series()?),
        keys::CURRENT_A => cycle.current_a = Some(slot.series()?),
        keys::CHARGE_CAPACITY_AH => cycle.charge_capacity_ah = Some(slot.series()?),
        keys::DISCHARGE_CAPACITY_AH => cycle.discharge_capacity_ah = Some(slot.series()?),
        keys::TIME_S => cycle.time_s = Some(slot.series()?),
        keys::TEMPERATURE_C => cycle.temperature_c = Some(slot.series()?),
        keys::INTERNAL_RESISTANCE_OHM => cycle.internal_resistance_ohm = slot.float()?,
        other => {
            cycle
                .additional_data
                .insert(other.to_string(), slot.checked_raw(kind)?);
        }
    }
    Ok(())
}

fn fill_cell(record: &mut CellRecord, slot: &Slot<'_>, kind: FieldKind) -> Result<(), RecordError> {
    match slot.key {
        keys::FORM_FACTOR => record.form_factor = slot.text(),
        keys::ANODE_MATERIAL => record.anode_material = slot.text(),
        keys::CATHODE_MATERIAL => record.cathode_material = slot.text(),
        keys::ELECTROLYTE_MATERIAL => record.electrolyte_material = slot.text(),
        keys::NOMINAL_CAPACITY_AH => record.nominal_capacity_ah = slot.float()?,
        keys::DEPTH_OF_CHARGE => {
            if let Some(value) = slot.float()? {
                record.depth_of_charge = value;
            }
        }
        keys::DEPTH_OF_DISCHARGE => {
            if let Some(value) = slot.float()? {
                record.depth_of_discharge = value;
            }
        }
        keys::INITIAL_CYCLES => {
            if let Some(value) = slot.integer()? {
                record.initial_cycles = value;
            }
        }
        keys::MAX_VOLTAGE_LIMIT_V => record.max_voltage_limit_v = slot.float()?,
        keys::MIN_VOLTAGE_LIMIT_V => record.min_voltage_limit_v = slot.float()?,
        keys::MAX_CURRENT_LIMIT_A => record.max_current_limit_a = slot.float()?,
        keys::MIN_CURRENT_LIMIT_A => record.min_current_limit_a = slot.float()?,
        keys::REFERENCE => record.reference = slot.text(),
        keys::DESCRIPTION => record.description = slot.text(),
        other => {
            record.extra.insert(other.to_string(), slot.checked_raw(kind)?);
        }
    }
    Ok(())
}
