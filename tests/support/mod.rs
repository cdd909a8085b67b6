#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use osint_catalog::SectionKind;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// The section files shipped with the repository.
pub fn shipped_data_dir() -> PathBuf {
    repo_root().join("public").join("data")
}

pub fn helper_binary(name: &str) -> PathBuf {
    let path = match name {
        "validate-data" => env!("CARGO_BIN_EXE_validate-data"),
        "catalog-table" => env!("CARGO_BIN_EXE_catalog-table"),
        other => panic!("unknown helper binary {other}"),
    };
    PathBuf::from(path)
}

/// Command for a helper with logging quiet and no inherited data-dir hint.
pub fn helper_command(name: &str) -> Command {
    let mut cmd = Command::new(helper_binary(name));
    cmd.env_remove("OSINT_CATALOG_DATA_DIR")
        .env("OSINT_CATALOG_LOG", "error");
    cmd
}

/// Run a command and return its output whatever the exit status.
pub fn run_capture(mut cmd: Command) -> Result<Output> {
    cmd.output()
        .with_context(|| format!("failed to run command: {:?}", cmd))
}

/// Run a command that must succeed.
pub fn run_command(cmd: Command) -> Result<Output> {
    let description = format!("{:?}", cmd);
    let output = run_capture(cmd)?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {description} failed: status {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

/// Stdout followed by stderr, lossily decoded.
pub fn combined_output(output: &Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

/// Temporary copy of the shipped section files.
pub fn data_fixture() -> Result<TempDir> {
    let dir = tempfile::tempdir().context("failed to allocate fixture dir")?;
    for kind in SectionKind::ALL {
        let name = kind.file_name();
        fs::copy(shipped_data_dir().join(&name), dir.path().join(&name))
            .with_context(|| format!("failed to copy {name}"))?;
    }
    Ok(dir)
}

pub fn write_section(dir: &Path, kind: SectionKind, document: &Value) -> Result<()> {
    let path = dir.join(kind.file_name());
    fs::write(&path, serde_json::to_string_pretty(document)?)
        .with_context(|| format!("failed to write {}", path.display()))
}

pub fn read_section(dir: &Path, kind: SectionKind) -> Result<Value> {
    let path = dir.join(kind.file_name());
    let text =
        fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}
