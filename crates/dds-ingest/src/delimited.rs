//! Delimited text reading (CSV, TSV and plain text).

use std::io::ErrorKind;
use std::path::Path;

use csv::ReaderBuilder;
use dds_model::{CellValue, RawColumn, RawTable};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};
use crate::format::FileFormat;

/// Separators tried, in order, for `.txt` inputs.
const TEXT_DELIMITERS: [u8; 4] = [b'\t', b',', b';', b' '];

/// Read a supported input file into a raw table.
pub fn read_table(path: &Path) -> Result<RawTable> {
    let format = FileFormat::detect(path);
    if !format.is_readable() {
        return Err(IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
            format,
        });
    }
    let text = read_text(path)?;
    let delimiter = match format {
        FileFormat::Tsv => b'\t',
        FileFormat::Text => sniff_delimiter(&text),
        _ => b',',
    };
    debug!(
        path = %path.display(),
        format = %format,
        delimiter = %char::from(delimiter).escape_default(),
        "reading delimited input"
    );
    parse_delimited(&text, delimiter, path)
}

/// Read a file with an explicit delimiter, ignoring its extension.
pub fn read_delimited(path: &Path, delimiter: u8) -> Result<RawTable> {
    let text = read_text(path)?;
    parse_delimited(&text, delimiter, path)
}

/// Read a whole file as UTF-8 text.
pub(crate) fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// First delimiter that splits the header line into more than one field,
/// falling back to tab.
pub fn sniff_delimiter(text: &str) -> u8 {
    let Some(header) = text.lines().find(|line| !line.trim().is_empty()) else {
        return b'\t';
    };
    for delimiter in TEXT_DELIMITERS {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(delimiter)
            .from_reader(header.as_bytes());
        let fields = reader
            .records()
            .next()
            .and_then(|record| record.ok())
            .map_or(0, |record| record.len());
        if fields > 1 {
            return delimiter;
        }
    }
    b'\t'
}

/// Parse delimited text into a raw table.
///
/// The first non-blank row is the header. Headers are trimmed and stripped
/// of a byte order mark; blank headers become `Unnamed: <idx>` and repeated
/// headers get `.1`, `.2`, ... suffixes. Blank rows are skipped, short rows
/// padded with missing values and surplus cells dropped.
pub fn parse_delimited(text: &str, delimiter: u8, path: &Path) -> Result<RawTable> {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut headers: Option<Vec<String>> = None;
    let mut columns: Vec<Vec<CellValue>> = Vec::new();
    let mut dropped_cells = 0usize;
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        match &headers {
            None => {
                let names = dedupe_headers(record.iter().map(normalize_header).collect());
                columns = vec![Vec::new(); names.len()];
                headers = Some(names);
            }
            Some(names) => {
                for (idx, values) in columns.iter_mut().enumerate() {
                    let value = record.get(idx).map_or(CellValue::Missing, CellValue::parse);
                    values.push(value);
                }
                dropped_cells += record.len().saturating_sub(names.len());
            }
        }
    }

    let Some(names) = headers else {
        warn!(path = %path.display(), "input has no header row");
        return Ok(RawTable::default());
    };
    if dropped_cells > 0 {
        warn!(path = %path.display(), dropped_cells, "rows longer than header were truncated");
    }
    let columns = names
        .into_iter()
        .zip(columns)
        .map(|(name, values)| RawColumn::new(name, values))
        .collect();
    RawTable::new(columns).map_err(|source| IngestError::Table {
        path: path.to_path_buf(),
        source,
    })
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

fn dedupe_headers(raw: Vec<String>) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(raw.len());
    for (idx, name) in raw.into_iter().enumerate() {
        let base = if name.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name
        };
        let mut candidate = base.clone();
        let mut suffix = 1;
        while names.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        names.push(candidate);
    }
    names
}
