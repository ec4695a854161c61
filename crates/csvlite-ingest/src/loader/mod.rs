//! Tabular loader: bytes → `Table`.

pub mod encoding;
pub mod infer;

use csvlite_core::config::{CsvConfig, Quoting};
use csvlite_core::errors::LoadError;
use csvlite_core::types::{Column, Table, Value};
use encoding_rs::Encoding;
use tracing::debug;

use self::infer::{infer_kind, materialize, non_null};

/// How to read one input.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub separator: u8,
    pub quoting: Quoting,
    /// Drop records whose field count differs from the header.
    pub skip_errors: bool,
    /// Tried in order after any byte-order mark.
    pub encodings: Vec<&'static Encoding>,
    /// Keep only these columns (those that exist).
    pub columns: Option<Vec<String>>,
    /// Keep every non-null cell as text.
    pub just_strings: bool,
}

impl LoadOptions {
    pub fn from_config(csv: &CsvConfig) -> Self {
        Self {
            separator: csv.effective_separator(),
            quoting: csv.effective_quoting(),
            skip_errors: csv.effective_skip_errors(),
            encodings: csv.effective_encodings(),
            columns: None,
            just_strings: csv.effective_just_strings(),
        }
    }

    pub fn with_columns(mut self, columns: Option<Vec<String>>) -> Self {
        self.columns = columns;
        self
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::from_config(&CsvConfig::default())
    }
}

/// Decode, parse and type one input into a table named `source_id`.
pub fn load_table(source_id: &str, bytes: &[u8], options: &LoadOptions) -> Result<Table, LoadError> {
    let (text, _) = encoding::decode(source_id, bytes, &options.encodings)?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.separator)
        .quoting(options.quoting.honours_quotes())
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = dedupe_headers(
        reader
            .headers()
            .map_err(|e| parse_error(source_id, e))?
            .iter(),
    );
    if headers.is_empty() {
        return Err(LoadError::NoHeader {
            source_id: source_id.to_string(),
        });
    }

    let keep: Vec<usize> = match &options.columns {
        Some(wanted) => (0..headers.len())
            .filter(|&i| wanted.contains(&headers[i]))
            .collect(),
        None => (0..headers.len()).collect(),
    };

    let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); keep.len()];
    let mut skipped = 0usize;
    for record in reader.records() {
        let record = record.map_err(|e| parse_error(source_id, e))?;
        if record.len() != headers.len() {
            let line = record.position().map_or(0, |p| p.line());
            if options.skip_errors {
                skipped += 1;
                debug!(source = source_id, line, fields = record.len(), "skipped malformed record");
                continue;
            }
            return Err(LoadError::MalformedRecord {
                source_id: source_id.to_string(),
                line,
                expected: headers.len(),
                found: record.len(),
            });
        }
        for (slot, &idx) in raw.iter_mut().zip(&keep) {
            slot.push(record.get(idx).and_then(non_null).map(str::to_string));
        }
    }

    let columns = keep
        .iter()
        .zip(raw)
        .map(|(&idx, cells)| build_column(&headers[idx], &cells, options.just_strings))
        .collect();

    let table = Table::new(source_id, columns).map_err(|e| LoadError::Parse {
        source_id: source_id.to_string(),
        message: e.to_string(),
    })?;
    debug!(
        source = source_id,
        rows = table.row_count(),
        columns = table.columns().len(),
        skipped,
        "loaded table"
    );
    Ok(table)
}

fn build_column(name: &str, cells: &[Option<String>], just_strings: bool) -> Column {
    let values = if just_strings {
        cells
            .iter()
            .map(|c| c.as_ref().map_or(Value::Null, |s| Value::Text(s.clone())))
            .collect()
    } else {
        let kind = infer_kind(cells.iter().map(Option::as_deref));
        cells.iter().map(|c| materialize(c.as_deref(), kind)).collect()
    };
    Column::new(name, values)
}

/// Blank headers become `Unnamed: <i>`; repeats become `name.1`, `name.2`, ...
fn dedupe_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for (i, name) in raw.enumerate() {
        let base = if name.is_empty() {
            format!("Unnamed: {i}")
        } else {
            name.to_string()
        };
        let mut candidate = base.clone();
        let mut n = 0;
        while out.contains(&candidate) {
            n += 1;
            candidate = format!("{base}.{n}");
        }
        out.push(candidate);
    }
    out
}

fn parse_error(source_id: &str, err: csv::Error) -> LoadError {
    LoadError::Parse {
        source_id: source_id.to_string(),
        message: err.to_string(),
    }
}
