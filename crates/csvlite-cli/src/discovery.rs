//! Resolve command-line paths into named inputs.

use std::fs;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use csvlite_core::types::FxHashSet;
use csvlite_ingest::InputSource;
use tracing::debug;
use walkdir::WalkDir;

/// Name given to input read from stdin.
pub const STDIN_NAME: &str = "stdin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLocation {
    Stdin,
    File(PathBuf),
}

/// A named input found on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovered {
    pub name: String,
    pub location: InputLocation,
}

/// Resolve `paths` in order. Files are named after their stem; directories
/// are searched recursively for `*.csv` and each file is named by its path
/// relative to the directory, without extension. Repeated names get `-1`,
/// `-2`, ... suffixes.
pub fn discover(paths: &[String]) -> Result<Vec<Discovered>> {
    let mut found = Vec::new();
    let mut taken: FxHashSet<String> = FxHashSet::default();
    let mut add = |name: String, location: InputLocation| {
        let name = unique_name(&taken, name);
        taken.insert(name.clone());
        found.push(Discovered { name, location });
    };

    for raw in paths {
        if raw == "-" {
            add(STDIN_NAME.to_string(), InputLocation::Stdin);
            continue;
        }
        let path = Path::new(raw);
        if path.is_file() {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| raw.clone());
            add(stem, InputLocation::File(path.to_path_buf()));
        } else if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.with_context(|| format!("reading directory {raw}"))?;
                let is_csv = entry.path().extension().is_some_and(|ext| ext == "csv");
                if !entry.file_type().is_file() || !is_csv {
                    continue;
                }
                let relative = entry.path().strip_prefix(path).unwrap_or(entry.path());
                add(relative_name(relative), InputLocation::File(entry.path().to_path_buf()));
            }
        } else {
            bail!("{raw}: no such file or directory");
        }
    }

    debug!(inputs = found.len(), "discovered inputs");
    Ok(found)
}

/// Read every discovered input into memory.
pub fn read_inputs(found: Vec<Discovered>) -> Result<Vec<InputSource>> {
    found
        .into_iter()
        .map(|d| {
            let bytes = match &d.location {
                InputLocation::File(path) => {
                    fs::read(path).with_context(|| format!("reading {}", path.display()))?
                }
                InputLocation::Stdin => {
                    let mut buf = Vec::new();
                    io::stdin().read_to_end(&mut buf).context("reading stdin")?;
                    buf
                }
            };
            Ok(InputSource::new(d.name, bytes))
        })
        .collect()
}

fn unique_name(taken: &FxHashSet<String>, name: String) -> String {
    if !taken.contains(&name) {
        return name;
    }
    (1..)
        .map(|i| format!("{name}-{i}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(name)
}

/// `sub/dir/file.csv` → `sub/dir/file`, always with `/`.
fn relative_name(relative: &Path) -> String {
    relative
        .with_extension("")
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
