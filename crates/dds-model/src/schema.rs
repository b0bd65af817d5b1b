//! Canonical field definitions for battery cycling data.
//!
//! The schema is the fixed vocabulary every input column is mapped onto.
//! Fields are split into two groups: cycle-level measurements (one series
//! per cycle) and cell-level metadata (one value per cell). Each field
//! carries the lexical variants the mapping engine treats as synonyms.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Field keys of the built-in battery schema.
pub mod keys {
    pub const CYCLE_NUMBER: &str = "cycle_number";
    pub const VOLTAGE_V: &str = "voltage_v";
    pub const CURRENT_A: &str = "current_a";
    pub const CHARGE_CAPACITY_AH: &str = "charge_capacity_ah";
    pub const DISCHARGE_CAPACITY_AH: &str = "discharge_capacity_ah";
    pub const TIME_S: &str = "time_s";
    pub const TEMPERATURE_C: &str = "temperature_c";
    pub const INTERNAL_RESISTANCE_OHM: &str = "internal_resistance_ohm";

    pub const CELL_ID: &str = "cell_id";
    pub const FORM_FACTOR: &str = "form_factor";
    pub const ANODE_MATERIAL: &str = "anode_material";
    pub const CATHODE_MATERIAL: &str = "cathode_material";
    pub const ELECTROLYTE_MATERIAL: &str = "electrolyte_material";
    pub const NOMINAL_CAPACITY_AH: &str = "nominal_capacity_ah";
    pub const DEPTH_OF_CHARGE: &str = "depth_of_charge";
    pub const DEPTH_OF_DISCHARGE: &str = "depth_of_discharge";
    pub const INITIAL_CYCLES: &str = "initial_cycles";
    pub const MAX_VOLTAGE_LIMIT_V: &str = "max_voltage_limit_v";
    pub const MIN_VOLTAGE_LIMIT_V: &str = "min_voltage_limit_v";
    pub const MAX_CURRENT_LIMIT_A: &str = "max_current_limit_a";
    pub const MIN_CURRENT_LIMIT_A: &str = "min_current_limit_a";
    pub const REFERENCE: &str = "reference";
    pub const DESCRIPTION: &str = "description";
}

/// Which record structure a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldGroup {
    /// Per-cycle measurement fields.
    Cycle,
    /// Per-cell metadata fields.
    Cell,
}

impl FieldGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldGroup::Cycle => "cycle",
            FieldGroup::Cell => "cell",
        }
    }
}

impl fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared value type of a canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// A single whole number.
    Integer,
    /// A single floating point number.
    Float,
    /// A sequence of floating point measurements.
    FloatSeries,
    /// A single text value.
    Text,
}

impl FieldKind {
    /// Short label used in tables.
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::FloatSeries => "float series",
            FieldKind::Text => "text",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FieldKind::Integer => "an integer",
            FieldKind::Float => "a number",
            FieldKind::FloatSeries => "a numeric series",
            FieldKind::Text => "text",
        };
        f.write_str(text)
    }
}

/// One entry of the canonical schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalField {
    key: String,
    group: FieldGroup,
    kind: FieldKind,
    synonyms: Vec<String>,
}

impl CanonicalField {
    /// Create a field. Synonyms keep their order; duplicates are dropped.
    pub fn new<I, S>(key: impl Into<String>, group: FieldGroup, kind: FieldKind, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for synonym in synonyms {
            let synonym = synonym.into();
            if !unique.contains(&synonym) {
                unique.push(synonym);
            }
        }
        Self {
            key: key.into(),
            group,
            kind,
            synonyms: unique,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn group(&self) -> FieldGroup {
        self.group
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn synonyms(&self) -> &[String] {
        &self.synonyms
    }
}

/// The ordered, immutable set of canonical fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalSchema {
    fields: Vec<CanonicalField>,
}

impl CanonicalSchema {
    /// Build a schema, rejecting empty or repeated keys.
    pub fn new(fields: Vec<CanonicalField>) -> Result<Self, ConfigError> {
        let mut seen: Vec<&str> = Vec::with_capacity(fields.len());
        for field in &fields {
            let key = field.key.trim();
            if key.is_empty() {
                return Err(ConfigError::EmptyFieldKey);
            }
            if seen.contains(&key) {
                return Err(ConfigError::DuplicateField(key.to_string()));
            }
            seen.push(key);
        }
        Ok(Self { fields })
    }

    /// The built-in battery schema: 8 cycle-level and 15 cell-level fields.
    pub fn battery() -> Self {
        let fields = CYCLE_FIELDS
            .iter()
            .map(|(key, kind, synonyms)| {
                CanonicalField::new(*key, FieldGroup::Cycle, *kind, synonyms.iter().copied())
            })
            .chain(CELL_FIELDS.iter().map(|(key, kind, synonyms)| {
                CanonicalField::new(*key, FieldGroup::Cell, *kind, synonyms.iter().copied())
            }))
            .collect();
        Self { fields }
    }

    pub fn fields(&self) -> &[CanonicalField] {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&CanonicalField> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.key.as_str())
    }

    /// Fields of one group, in schema order.
    pub fn group(&self, group: FieldGroup) -> impl Iterator<Item = &CanonicalField> {
        self.fields.iter().filter(move |field| field.group == group)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for CanonicalSchema {
    fn default() -> Self {
        Self::battery()
    }
}

type FieldDef = (&'static str, FieldKind, &'static [&'static str]);

// Synonyms are lexical variants only. A synonym of one field must never be
// an exact synonym of another field.
const CYCLE_FIELDS: &[FieldDef] = &[
    (
        keys::CYCLE_NUMBER,
        FieldKind::Integer,
        &[
            "cycle",
            "cycle number",
            "cycle index",
            "cycle count",
            "cycle no",
            "cycle nr",
            "cyc",
        ],
    ),
    (
        keys::VOLTAGE_V,
        FieldKind::FloatSeries,
        &[
            "voltage",
            "volt",
            "volts",
            "v",
            "potential",
            "ecell",
            "cell voltage",
            "u",
        ],
    ),
    (
        keys::CURRENT_A,
        FieldKind::FloatSeries,
        &[
            "current", "curr", "amp", "amps", "ampere", "amperes", "a", "i",
        ],
    ),
    (
        keys::CHARGE_CAPACITY_AH,
        FieldKind::FloatSeries,
        &[
            "charge capacity",
            "chg capacity",
            "charge cap",
            "chg cap",
            "qc",
            "q charge",
            "charge ah",
        ],
    ),
    (
        keys::DISCHARGE_CAPACITY_AH,
        FieldKind::FloatSeries,
        &[
            "discharge capacity",
            "dchg capacity",
            "dis capacity",
            "discharge cap",
            "dchg cap",
            "qd",
            "q discharge",
            "discharge ah",
        ],
    ),
    (
        keys::TIME_S,
        FieldKind::FloatSeries,
        &[
            "time",
            "t",
            "seconds",
            "second",
            "sec",
            "secs",
            "s",
            "timestamp",
            "test time",
            "elapsed time",
            "step time",
        ],
    ),
    (
        keys::TEMPERATURE_C,
        FieldKind::FloatSeries,
        &[
            "temperature",
            "temp",
            "celsius",
            "degc",
            "deg c",
            "c",
            "cell temperature",
        ],
    ),
    (
        keys::INTERNAL_RESISTANCE_OHM,
        FieldKind::Float,
        &[
            "internal resistance",
            "resistance",
            "ir",
            "ohm",
            "ohms",
            "r",
            "impedance",
            "dcir",
        ],
    ),
];

const CELL_FIELDS: &[FieldDef] = &[
    (
        keys::CELL_ID,
        FieldKind::Text,
        &[
            "cell id",
            "cell name",
            "battery id",
            "battery",
            "id",
            "identifier",
            "barcode",
            "serial number",
        ],
    ),
    (
        keys::FORM_FACTOR,
        FieldKind::Text,
        &["form factor", "format", "cell format", "geometry", "form"],
    ),
    (
        keys::ANODE_MATERIAL,
        FieldKind::Text,
        &[
            "anode",
            "anode material",
            "negative electrode",
            "negative material",
        ],
    ),
    (
        keys::CATHODE_MATERIAL,
        FieldKind::Text,
        &[
            "cathode",
            "cathode material",
            "positive electrode",
            "positive material",
            "chemistry",
        ],
    ),
    (
        keys::ELECTROLYTE_MATERIAL,
        FieldKind::Text,
        &["electrolyte", "electrolyte material", "solvent"],
    ),
    (
        keys::NOMINAL_CAPACITY_AH,
        FieldKind::Float,
        &[
            "nominal capacity",
            "rated capacity",
            "nominal cap",
            "rated cap",
            "design capacity",
        ],
    ),
    (
        keys::DEPTH_OF_CHARGE,
        FieldKind::Float,
        &["depth of charge", "doc", "charge depth"],
    ),
    (
        keys::DEPTH_OF_DISCHARGE,
        FieldKind::Float,
        &["depth of discharge", "dod", "discharge depth"],
    ),
    (
        keys::INITIAL_CYCLES,
        FieldKind::Integer,
        &[
            "initial cycles",
            "prior cycles",
            "previous cycles",
            "initial cycle count",
        ],
    ),
    (
        keys::MAX_VOLTAGE_LIMIT_V,
        FieldKind::Float,
        &[
            "max voltage",
            "max voltage limit",
            "vmax",
            "v max",
            "upper voltage limit",
            "upper cutoff",
        ],
    ),
    (
        keys::MIN_VOLTAGE_LIMIT_V,
        FieldKind::Float,
        &[
            "min voltage",
            "min voltage limit",
            "vmin",
            "v min",
            "lower voltage limit",
            "lower cutoff",
        ],
    ),
    (
        keys::MAX_CURRENT_LIMIT_A,
        FieldKind::Float,
        &["max current", "max current limit", "imax"],
    ),
    (
        keys::MIN_CURRENT_LIMIT_A,
        FieldKind::Float,
        &["min current", "min current limit", "imin"],
    ),
    (
        keys::REFERENCE,
        FieldKind::Text,
        &["reference", "ref", "source", "citation", "doi"],
    ),
    (
        keys::DESCRIPTION,
        FieldKind::Text,
        &[
            "description",
            "desc",
            "notes",
            "note",
            "comment",
            "comments",
            "remarks",
        ],
    ),
];
