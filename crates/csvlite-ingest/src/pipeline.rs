//! The end-to-end import run.

use std::time::Instant;

use csvlite_core::config::CsvliteConfig;
use csvlite_core::errors::{ConfigError, ImportError, ImportReport, StorageError};
use csvlite_core::types::{FxHashMap, FxHashSet, SqlType, Table, Value};
use csvlite_storage::fulltext::{self, build_fulltext};
use csvlite_storage::queries::catalog;
use csvlite_storage::schema::{add_index, persist_table};
use csvlite_storage::{DatabaseManager, LookupRegistry, TableSchema};
use rayon::prelude::*;
use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::dates::DateNormalizer;
use crate::loader::{load_table, LoadOptions};
use crate::plan::{CompiledPlan, ImportPlan};
use crate::refactor::refactor_table;
use crate::shape::{apply_shape, source_columns, ShapeEntry};

/// One named input.
#[derive(Debug, Clone)]
pub struct InputSource {
    /// Logical name; becomes the table name unless the plan overrides it.
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputSource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// A loaded, reshaped and date-normalized table awaiting persistence.
struct PreparedTable {
    table: Table,
    type_overrides: FxHashMap<String, SqlType>,
}

/// Import `inputs` into `db`.
///
/// Inputs are loaded in parallel. Inputs that fail to load are skipped and
/// recorded in the report; every other error aborts the run.
pub fn run_import(
    db: &DatabaseManager,
    inputs: &[InputSource],
    config: &CsvliteConfig,
    plan: &ImportPlan,
) -> Result<ImportReport, ImportError> {
    let started = Instant::now();
    let compiled = plan.compile()?;
    let mut report = ImportReport::default();

    let shape = compiled.shape.as_ref().map(|entries| {
        let mut entries = entries.clone();
        for name in plan.injected_columns() {
            if !entries.iter().any(|e| e.target == name) {
                entries.push(ShapeEntry::keep(name));
            }
        }
        entries
    });
    let options =
        LoadOptions::from_config(&config.csv).with_columns(shape.as_deref().map(source_columns));
    let normalizer = DateNormalizer::new(plan.datetime_formats.clone());

    let loaded: Vec<Result<PreparedTable, ImportError>> = inputs
        .par_iter()
        .map(|input| prepare_table(input, &options, plan, shape.as_deref(), &normalizer))
        .collect();

    let mut prepared = Vec::with_capacity(loaded.len());
    for (input, result) in inputs.iter().zip(loaded) {
        match result {
            Ok(ready) => {
                info!(
                    source = %input.name,
                    table = %ready.table.name(),
                    rows = ready.table.row_count(),
                    "loaded input"
                );
                prepared.push(ready);
            }
            Err(ImportError::Load(e)) => {
                warn!(source = %input.name, error = %e, "skipping input");
                report.add_error(e);
            }
            Err(e) => return Err(e),
        }
    }

    let missing_pk = prepared
        .iter()
        .find_map(|p| missing_column(&p.table, &plan.primary_key));
    if let Some((table, column)) = missing_pk {
        return Err(ConfigError::UnknownColumn {
            context: "Primary key",
            column,
            table,
        }
        .into());
    }

    if !plan.fulltext.is_empty() {
        check_fulltext_columns(db, &prepared, config, plan)?;
    }

    db.with_writer(|conn| Ok(write_tables(conn, prepared, config, plan, &compiled, &mut report)))??;
    db.finish()?;

    for table in &report.tables {
        let rows = db.with_reader(|conn| catalog::count_rows(conn, table))?;
        info!(table = %table, rows, "table ready");
    }

    info!(
        tables = report.tables.len(),
        created = report.created_tables.len(),
        lookups = report.lookup_tables.len(),
        rows = report.rows_written,
        skipped = report.error_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "import finished"
    );
    Ok(report)
}

fn prepare_table(
    input: &InputSource,
    options: &LoadOptions,
    plan: &ImportPlan,
    shape: Option<&[ShapeEntry]>,
    normalizer: &DateNormalizer,
) -> Result<PreparedTable, ImportError> {
    let mut table = load_table(&input.name, &input.bytes, options)?;
    if let Some(name) = &plan.table {
        table.set_name(name.as_str());
    }

    if let Some(column) = &plan.filename_column {
        table.set_constant(column, Value::Text(input.name.clone()))?;
    }
    for (column, value) in &plan.fixed_columns {
        table.set_constant(column, Value::Text(value.clone()))?;
    }
    for (column, value) in &plan.fixed_int_columns {
        table.set_constant(column, Value::Integer(*value))?;
    }
    for (column, value) in &plan.fixed_float_columns {
        table.set_constant(column, Value::Real(*value))?;
    }

    let type_overrides = match shape {
        Some(entries) => apply_shape(&mut table, entries)?,
        None => FxHashMap::default(),
    };
    normalizer.normalize_table(&mut table, &plan.dates, &plan.datetimes)?;

    Ok(PreparedTable {
        table,
        type_overrides,
    })
}

/// (table, column) for the first of `columns` missing from `table`.
fn missing_column(table: &Table, columns: &[String]) -> Option<(String, String)> {
    columns
        .iter()
        .find(|c| !table.has_column(c))
        .map(|c| (table.name().to_string(), c.clone()))
}

/// Full-text columns must exist on every table this run will create.
/// Tables that already exist are appended to and never indexed, unless
/// replace mode drops them first.
fn check_fulltext_columns(
    db: &DatabaseManager,
    prepared: &[PreparedTable],
    config: &CsvliteConfig,
    plan: &ImportPlan,
) -> Result<(), ImportError> {
    let replace = config.schema.effective_replace_tables();
    for PreparedTable { table, .. } in prepared {
        if !replace && db.with_reader(|conn| catalog::table_exists(conn, table.name()))? {
            continue;
        }
        if let Some((table, column)) = missing_column(table, &plan.fulltext) {
            return Err(ConfigError::UnknownColumn {
                context: "Full-text",
                column,
                table,
            }
            .into());
        }
    }
    Ok(())
}

/// Extraction, persistence, custom indexes and full-text, on the writer.
fn write_tables(
    conn: &Connection,
    prepared: Vec<PreparedTable>,
    config: &CsvliteConfig,
    plan: &ImportPlan,
    compiled: &CompiledPlan,
    report: &mut ImportReport,
) -> Result<(), ImportError> {
    let mut registry = LookupRegistry::new(
        config.lookup.effective_cache_size(),
        config.fulltext.effective_lookup_shadows(),
    );
    let replace = config.schema.effective_replace_tables();
    let index_fks = config.schema.effective_index_fks();
    let mut replaced: FxHashSet<String> = FxHashSet::default();

    for PreparedTable {
        mut table,
        type_overrides,
    } in prepared
    {
        for lookup in refactor_table(conn, &mut registry, &mut table, &compiled.foreign_keys)? {
            if !report.lookup_tables.contains(&lookup) {
                report.lookup_tables.push(lookup);
            }
        }

        let schema = TableSchema::derive(
            &table,
            &compiled.foreign_keys,
            &type_overrides,
            &plan.primary_key,
            index_fks,
        )?;
        let name = table.name().to_string();
        // Replace mode drops a table once; later inputs for the same name append.
        let drop_first = replace && replaced.insert(name.clone());
        let outcome = persist_table(conn, &table, &schema, drop_first)?;

        if outcome.created && !report.created_tables.contains(&name) {
            report.created_tables.push(name.clone());
        }
        if !report.tables.contains(&name) {
            report.tables.push(name);
        }
        report.rows_written += outcome.rows;
    }

    for columns in &compiled.indexes {
        for table in &report.tables {
            match add_index(conn, table, columns)? {
                Some(index) => debug!(table = %table, index = %index, "created index"),
                None => warn!(table = %table, columns = %columns.join(","), "index skipped; columns missing"),
            }
        }
    }

    if !plan.fulltext.is_empty() {
        build_requested_fulltext(conn, plan, compiled, report)?;
    }
    Ok(())
}

fn build_requested_fulltext(
    conn: &Connection,
    plan: &ImportPlan,
    compiled: &CompiledPlan,
    report: &ImportReport,
) -> Result<(), ImportError> {
    if report.created_tables.is_empty() {
        info!("no new tables; full-text index not built");
        return Ok(());
    }
    let engine = fulltext::best_engine().ok_or(StorageError::NoFullTextSupport)?;

    build_fulltext(
        conn,
        engine,
        &report.created_tables,
        &plan.fulltext,
        &compiled.foreign_keys,
    )?;
    Ok(())
}
