//! Shared library for the OSINT tool catalog.
//!
//! The catalog ships as one JSON document per section under `public/data/`.
//! This crate validates those documents, normalizes their records, loads them
//! asynchronously from disk or over HTTP, and exposes a generic sortable,
//! filterable table engine. The `validate-data` and `catalog-table` binaries
//! are thin front ends over these modules.

use anyhow::{Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing_subscriber::EnvFilter;

pub mod catalog;
pub mod coverage;
pub mod data_validation;
pub mod loader;
pub mod normalize;
pub mod schema_loader;
pub mod table;
pub mod validation;

pub use catalog::{
    CatalogRepository, CategoryCode, CategoryDictionary, CategoryMeta, DuplicateName, Flag,
    Record, SearchIndex, Section, SectionFields, SectionKind, Status,
};
pub use coverage::{CategoryUsage, CoverageEntry, build_category_coverage, unused_categories};
pub use data_validation::{SectionFile, ValidationRun, run_validation, section_files};
pub use loader::{
    CatalogLoad, FileSource, HttpSource, LoadError, LoadStatus, SectionLoader, SectionSource,
    SectionState, load_catalog, load_section,
};
pub use normalize::{normalize, normalize_section};
pub use schema_loader::SectionSchema;
pub use table::{
    CategoryFilter, CellValue, ColumnSpec, SearchFilter, SortDirection, SortState, TableRow,
    build_view, section_columns,
};
pub use validation::{Issue, IssueKind, Severity, ValidatedSection, ValidationIssues, validate};

/// Data directory relative to the repository root.
pub const DATA_SUBDIR: &str = "public/data";
pub const DATA_DIR_ENV: &str = "OSINT_CATALOG_DATA_DIR";
pub const LOG_ENV: &str = "OSINT_CATALOG_LOG";

/// Returns true when `candidate` is a directory holding at least one section
/// document.
fn is_data_dir(candidate: &Path) -> bool {
    candidate.is_dir()
        && SectionKind::ALL
            .iter()
            .any(|kind| candidate.join(kind.file_name()).is_file())
}

fn data_dir_from_hint(candidate: &Path) -> Option<PathBuf> {
    if !is_data_dir(candidate) {
        return None;
    }
    fs::canonicalize(candidate).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        let candidate = dir.join(DATA_SUBDIR);
        if is_data_dir(&candidate) {
            return Some(candidate);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Locate the section data directory.
///
/// Search order: an explicit path (which must exist), the `env_hint` value,
/// `public/data` in `start` or any ancestor, then the repository root
/// recorded at build time.
pub fn resolve_data_dir_from(
    explicit: Option<&Path>,
    env_hint: Option<&str>,
    start: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if !path.is_dir() {
            bail!("data directory {} does not exist", path.display());
        }
        return Ok(path.to_path_buf());
    }

    if let Some(dir) = env_hint
        .filter(|hint| !hint.trim().is_empty())
        .and_then(|hint| data_dir_from_hint(Path::new(hint)))
    {
        return Ok(dir);
    }

    if let Some(dir) = start.and_then(search_upwards) {
        return Ok(dir);
    }

    if let Some(built) = option_env!("OSINT_CATALOG_DATA_HINT") {
        if let Some(dir) = data_dir_from_hint(Path::new(built)) {
            return Ok(dir);
        }
    }

    bail!(
        "Unable to locate the section data directory. Pass --data-dir or set {DATA_DIR_ENV} to a directory holding the section JSON files."
    );
}

/// `resolve_data_dir_from` fed from the process environment and working
/// directory.
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    let env_hint = env::var(DATA_DIR_ENV).ok();
    let cwd = env::current_dir().ok();
    resolve_data_dir_from(explicit, env_hint.as_deref(), cwd.as_deref())
}

/// Install the stderr tracing subscriber used by the binaries. The filter
/// comes from `OSINT_CATALOG_LOG` and defaults to `warn`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Split comma- or whitespace-delimited lists into tokens.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
