//! One command-line run.

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use csvlite_core::config::CsvliteConfig;
use csvlite_core::errors::{ImportError, ImportReport};
use csvlite_ingest::run_import;
use csvlite_storage::DatabaseManager;

use crate::args::Cli;
use crate::discovery::{discover, read_inputs};

/// What a run did, rendered as the closing summary line.
#[derive(Debug)]
pub struct RunSummary {
    pub database: PathBuf,
    /// Inputs found on the command line, including any that failed to load.
    pub files: usize,
    /// The database existed before the run.
    pub existed: bool,
    pub report: ImportReport,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.files == 1 { "" } else { "s" };
        if self.existed {
            write!(f, "Added {} CSV file{plural} to {}", self.files, self.database.display())
        } else {
            write!(f, "Created {} from {} CSV file{plural}", self.database.display(), self.files)
        }
    }
}

/// Resolve config and inputs, then import into the database named by `cli`.
pub fn run(cli: &Cli) -> Result<RunSummary> {
    let database = cli.database_path()?;
    let plan = cli.plan()?;
    let cwd = std::env::current_dir().context("reading working directory")?;
    let config = CsvliteConfig::load(&cwd, cli.config.as_deref(), Some(&cli.overrides()))
        .map_err(ImportError::from)?;

    let inputs = read_inputs(discover(&cli.paths)?)?;
    let existed = database.exists();
    let db = DatabaseManager::open(&database).map_err(ImportError::from)?;
    let report = run_import(&db, &inputs, &config, &plan)?;

    Ok(RunSummary {
        database,
        files: inputs.len(),
        existed,
        report,
    })
}
