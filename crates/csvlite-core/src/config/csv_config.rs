//! Delimited-text reading configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ENCODINGS, DEFAULT_QUOTING, DEFAULT_SEPARATOR};

/// Quoting behaviour, numbered after the classic `QUOTE_*` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quoting {
    /// `QUOTE_MINIMAL` (0).
    #[default]
    Minimal,
    /// `QUOTE_ALL` (1).
    All,
    /// `QUOTE_NONNUMERIC` (2).
    NonNumeric,
    /// `QUOTE_NONE` (3): quote characters are ordinary data.
    None,
}

impl Quoting {
    /// Map a `QUOTE_*` number to a mode.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Minimal),
            1 => Some(Self::All),
            2 => Some(Self::NonNumeric),
            3 => Some(Self::None),
            _ => None,
        }
    }

    /// Whether the reader should honour double quotes.
    pub fn honours_quotes(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Configuration for the tabular loader.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CsvConfig {
    /// Field separator. Must encode to a single byte. Default: `,`.
    pub separator: Option<String>,
    /// `QUOTE_*` constant, 0-3. Default: 0.
    pub quoting: Option<u8>,
    /// Drop records with the wrong number of fields instead of failing. Default: false.
    pub skip_errors: Option<bool>,
    /// Encoding labels tried after any byte-order mark. Default: utf-8, windows-1252.
    #[serde(default)]
    pub encodings: Vec<String>,
    /// Keep every value as text. Default: false.
    pub just_strings: Option<bool>,
}

impl CsvConfig {
    /// Returns the effective separator byte, defaulting to `,`.
    pub fn effective_separator(&self) -> u8 {
        self.separator
            .as_deref()
            .and_then(single_byte)
            .unwrap_or(DEFAULT_SEPARATOR as u8)
    }

    /// Returns the effective quoting mode, defaulting to `QUOTE_MINIMAL`.
    pub fn effective_quoting(&self) -> Quoting {
        self.quoting
            .and_then(Quoting::from_code)
            .or_else(|| Quoting::from_code(DEFAULT_QUOTING))
            .unwrap_or_default()
    }

    /// Returns the effective skip-errors flag, defaulting to false.
    pub fn effective_skip_errors(&self) -> bool {
        self.skip_errors.unwrap_or(false)
    }

    /// Returns the effective just-strings flag, defaulting to false.
    pub fn effective_just_strings(&self) -> bool {
        self.just_strings.unwrap_or(false)
    }

    /// Returns the configured encodings resolved to `encoding_rs` encodings,
    /// falling back to the compiled defaults. Unknown labels are skipped here;
    /// `CsvliteConfig::validate` rejects them up front.
    pub fn effective_encodings(&self) -> Vec<&'static encoding_rs::Encoding> {
        let labels: Vec<&str> = if self.encodings.is_empty() {
            DEFAULT_ENCODINGS.to_vec()
        } else {
            self.encodings.iter().map(String::as_str).collect()
        };
        labels
            .into_iter()
            .filter_map(|label| encoding_rs::Encoding::for_label(label.as_bytes()))
            .collect()
    }
}

/// Interpret a separator string, accepting the `\t` escape.
pub(crate) fn single_byte(sep: &str) -> Option<u8> {
    let sep = if sep == "\\t" { "\t" } else { sep };
    match sep.as_bytes() {
        [b] => Some(*b),
        _ => None,
    }
}
