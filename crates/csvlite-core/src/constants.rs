//! Compiled defaults shared across crates.

/// Default field separator.
pub const DEFAULT_SEPARATOR: char = ',';

/// Default quoting mode (`QUOTE_MINIMAL`).
pub const DEFAULT_QUOTING: u8 = 0;

/// Distinct values memoized per lookup table before eviction.
pub const DEFAULT_LOOKUP_CACHE_SIZE: u64 = 1000;

/// Value column used when an extraction directive names none.
pub const DEFAULT_LOOKUP_VALUE_COLUMN: &str = "value";

/// Encodings tried, in order, after any byte-order-mark match.
pub const DEFAULT_ENCODINGS: &[&str] = &["utf-8", "windows-1252"];

/// Suffix of the full-text shadow table for a content table.
pub const FTS_TABLE_SUFFIX: &str = "_fts";

/// Project-level config file name.
pub const CONFIG_FILE_NAME: &str = "csvlite.toml";

/// Cell spellings read as missing values.
pub const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Returns true if `cell` is one of the recognised missing-value spellings.
pub fn is_na_token(cell: &str) -> bool {
    NA_TOKENS.contains(&cell)
}
