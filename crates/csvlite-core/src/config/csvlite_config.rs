//! Top-level csvlite configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::csv_config::single_byte;
use super::{CsvConfig, FullTextConfig, LookupConfig, SchemaConfig};
use crate::constants::CONFIG_FILE_NAME;
use crate::errors::ConfigError;

pub const ENV_SEPARATOR: &str = "CSVLITE_SEPARATOR";
pub const ENV_REPLACE_TABLES: &str = "CSVLITE_REPLACE_TABLES";
pub const ENV_LOOKUP_CACHE_SIZE: &str = "CSVLITE_LOOKUP_CACHE_SIZE";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`CSVLITE_*`)
/// 3. Project config (`csvlite.toml` in the working directory, or an explicit path)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CsvliteConfig {
    pub csv: CsvConfig,
    pub schema: SchemaConfig,
    pub lookup: LookupConfig,
    pub fulltext: FullTextConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub separator: Option<String>,
    pub quoting: Option<u8>,
    pub skip_errors: Option<bool>,
    pub just_strings: Option<bool>,
    pub replace_tables: Option<bool>,
    pub index_fks: Option<bool>,
    pub lookup_shadows: Option<bool>,
}

impl CsvliteConfig {
    /// Load configuration with layered resolution.
    ///
    /// `explicit` names a config file that must exist; otherwise
    /// `csvlite.toml` in `root` is merged when present.
    pub fn load(
        root: &Path,
        explicit: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        match explicit {
            Some(path) => Self::merge_toml_file(&mut config, path)?,
            None => {
                let project_config_path = root.join(CONFIG_FILE_NAME);
                if project_config_path.exists() {
                    Self::merge_toml_file(&mut config, &project_config_path)?;
                }
            }
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &CsvliteConfig) -> Result<(), ConfigError> {
        if let Some(ref sep) = config.csv.separator {
            if single_byte(sep).is_none() {
                return Err(ConfigError::ValidationFailed {
                    field: "csv.separator".to_string(),
                    message: format!("\"{sep}\" must be a single byte"),
                });
            }
        }
        if let Some(quoting) = config.csv.quoting {
            if quoting > 3 {
                return Err(ConfigError::ValidationFailed {
                    field: "csv.quoting".to_string(),
                    message: "must be between 0 and 3".to_string(),
                });
            }
        }
        for label in &config.csv.encodings {
            if encoding_rs::Encoding::for_label(label.as_bytes()).is_none() {
                return Err(ConfigError::ValidationFailed {
                    field: "csv.encodings".to_string(),
                    message: format!("unknown encoding \"{label}\""),
                });
            }
        }
        if config.lookup.cache_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "lookup.cache_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut CsvliteConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: CsvliteConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a `Some` value.
    fn merge(base: &mut CsvliteConfig, other: &CsvliteConfig) {
        if other.csv.separator.is_some() {
            base.csv.separator = other.csv.separator.clone();
        }
        if other.csv.quoting.is_some() {
            base.csv.quoting = other.csv.quoting;
        }
        if other.csv.skip_errors.is_some() {
            base.csv.skip_errors = other.csv.skip_errors;
        }
        if !other.csv.encodings.is_empty() {
            base.csv.encodings = other.csv.encodings.clone();
        }
        if other.csv.just_strings.is_some() {
            base.csv.just_strings = other.csv.just_strings;
        }

        if other.schema.replace_tables.is_some() {
            base.schema.replace_tables = other.schema.replace_tables;
        }
        if other.schema.index_fks.is_some() {
            base.schema.index_fks = other.schema.index_fks;
        }

        if other.lookup.cache_size.is_some() {
            base.lookup.cache_size = other.lookup.cache_size;
        }

        if other.fulltext.lookup_shadows.is_some() {
            base.fulltext.lookup_shadows = other.fulltext.lookup_shadows;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(config: &mut CsvliteConfig) {
        if let Ok(val) = std::env::var(ENV_SEPARATOR) {
            config.csv.separator = Some(val);
        }
        if let Ok(val) = std::env::var(ENV_REPLACE_TABLES) {
            if let Ok(v) = val.parse::<bool>() {
                config.schema.replace_tables = Some(v);
            }
        }
        if let Ok(val) = std::env::var(ENV_LOOKUP_CACHE_SIZE) {
            if let Ok(v) = val.parse::<u64>() {
                config.lookup.cache_size = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut CsvliteConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.separator {
            config.csv.separator = Some(v.clone());
        }
        if let Some(v) = cli.quoting {
            config.csv.quoting = Some(v);
        }
        if let Some(v) = cli.skip_errors {
            config.csv.skip_errors = Some(v);
        }
        if let Some(v) = cli.just_strings {
            config.csv.just_strings = Some(v);
        }
        if let Some(v) = cli.replace_tables {
            config.schema.replace_tables = Some(v);
        }
        if let Some(v) = cli.index_fks {
            config.schema.index_fks = Some(v);
        }
        if let Some(v) = cli.lookup_shadows {
            config.fulltext.lookup_shadows = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
