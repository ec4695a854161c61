//! Tests for the csvlite configuration system.

use std::sync::Mutex;

use csvlite_core::config::csvlite_config::{
    ENV_LOOKUP_CACHE_SIZE, ENV_REPLACE_TABLES, ENV_SEPARATOR,
};
use csvlite_core::config::{CliOverrides, CsvliteConfig, Quoting};
use csvlite_core::errors::ConfigError;

/// Global mutex to serialize tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Clear all CSVLITE_ config env vars to prevent cross-test contamination.
fn clear_env_vars() {
    for key in [ENV_SEPARATOR, ENV_REPLACE_TABLES, ENV_LOOKUP_CACHE_SIZE] {
        std::env::remove_var(key);
    }
}

/// CLI beats env, env beats the project file.
#[test]
fn test_layered_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env_vars();

    let dir = tempdir();
    std::fs::write(
        dir.path().join("csvlite.toml"),
        r#"
[csv]
separator = ";"
quoting = 1

[lookup]
cache_size = 50
"#,
    )
    .unwrap();

    std::env::set_var(ENV_LOOKUP_CACHE_SIZE, "75");
    std::env::set_var(ENV_SEPARATOR, "|");

    let cli = CliOverrides {
        separator: Some("\\t".into()),
        ..Default::default()
    };
    let config = CsvliteConfig::load(dir.path(), None, Some(&cli)).unwrap();

    assert_eq!(config.csv.effective_separator(), b'\t');
    assert_eq!(config.lookup.effective_cache_size(), 75);
    assert_eq!(config.csv.effective_quoting(), Quoting::All);

    clear_env_vars();
}

#[test]
fn test_missing_project_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env_vars();

    let dir = tempdir();
    let config = CsvliteConfig::load(dir.path(), None, None).unwrap();

    assert_eq!(config.csv.effective_separator(), b',');
    assert_eq!(config.csv.effective_quoting(), Quoting::Minimal);
    assert!(!config.csv.effective_skip_errors());
    assert!(!config.csv.effective_just_strings());
    assert!(!config.schema.effective_replace_tables());
    assert!(config.schema.effective_index_fks());
    assert_eq!(config.lookup.effective_cache_size(), 1000);
    assert!(config.fulltext.effective_lookup_shadows());

    let encodings: Vec<&str> = config
        .csv
        .effective_encodings()
        .iter()
        .map(|e| e.name())
        .collect();
    assert_eq!(encodings, vec!["UTF-8", "windows-1252"]);
}

#[test]
fn test_env_bool_override() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env_vars();

    let dir = tempdir();
    std::env::set_var(ENV_REPLACE_TABLES, "true");
    let config = CsvliteConfig::load(dir.path(), None, None).unwrap();
    assert!(config.schema.effective_replace_tables());

    // Unparsable values are ignored.
    std::env::set_var(ENV_REPLACE_TABLES, "maybe");
    let config = CsvliteConfig::load(dir.path(), None, None).unwrap();
    assert_eq!(config.schema.replace_tables, None);

    clear_env_vars();
}

#[test]
fn test_explicit_path_must_exist() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env_vars();

    let dir = tempdir();
    let missing = dir.path().join("nope.toml");
    match CsvliteConfig::load(dir.path(), Some(&missing), None).unwrap_err() {
        ConfigError::FileNotFound { path } => assert!(path.ends_with("nope.toml")),
        other => panic!("Expected FileNotFound, got: {:?}", other),
    }
}

#[test]
fn test_explicit_path_replaces_project_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env_vars();

    let dir = tempdir();
    std::fs::write(dir.path().join("csvlite.toml"), "[csv]\nseparator = \";\"\n").unwrap();
    let other = dir.path().join("other.toml");
    std::fs::write(&other, "[schema]\nindex_fks = false\n").unwrap();

    let config = CsvliteConfig::load(dir.path(), Some(&other), None).unwrap();
    assert_eq!(config.csv.separator, None);
    assert!(!config.schema.effective_index_fks());
}

#[test]
fn test_invalid_toml_syntax() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env_vars();

    let dir = tempdir();
    std::fs::write(dir.path().join("csvlite.toml"), "this is not valid toml {{{{").unwrap();

    match CsvliteConfig::load(dir.path(), None, None).unwrap_err() {
        ConfigError::ParseError { .. } => {}
        other => panic!("Expected ParseError, got: {:?}", other),
    }
}

#[test]
fn test_validation_rejects_bad_values() {
    let cases = [
        ("[csv]\nseparator = \"::\"\n", "csv.separator"),
        ("[csv]\nquoting = 7\n", "csv.quoting"),
        ("[csv]\nencodings = [\"klingon\"]\n", "csv.encodings"),
        ("[lookup]\ncache_size = 0\n", "lookup.cache_size"),
    ];
    for (toml_str, expected_field) in cases {
        let config = CsvliteConfig::from_toml(toml_str).unwrap();
        match CsvliteConfig::validate(&config).unwrap_err() {
            ConfigError::ValidationFailed { field, .. } => assert_eq!(field, expected_field),
            other => panic!("Expected ValidationFailed, got: {:?}", other),
        }
    }
}

#[test]
fn test_unrecognized_keys_accepted() {
    let config = CsvliteConfig::from_toml(
        r#"
[csv]
separator = ","
someday = "maybe"

[future_section]
answer = 42
"#,
    );
    assert!(config.is_ok());
}

#[test]
fn test_custom_encodings_and_roundtrip() {
    let config = CsvliteConfig::from_toml(
        r#"
[csv]
encodings = ["latin1", "utf-16le"]
just_strings = true
"#,
    )
    .unwrap();
    let names: Vec<&str> = config
        .csv
        .effective_encodings()
        .iter()
        .map(|e| e.name())
        .collect();
    assert_eq!(names, vec!["windows-1252", "UTF-16LE"]);

    let reparsed = CsvliteConfig::from_toml(&config.to_toml().unwrap()).unwrap();
    assert_eq!(reparsed.csv.just_strings, Some(true));
    assert_eq!(reparsed.csv.encodings, config.csv.encodings);
}
