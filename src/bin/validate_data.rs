//! Validate every section document under the data directory.
//!
//! Exits 0 when all sections pass (warnings allowed) and 1 when any section
//! has an error-class issue or the data directory cannot be found. Every
//! section is checked before exiting so one run reports all problems.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use osint_catalog::{init_logging, resolve_data_dir, run_validation, section_files};
use std::path::PathBuf;
use tracing::debug;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "validate-data",
    version,
    about = "Validate the OSINT catalog section files"
)]
struct Cli {
    /// Directory holding `<section>.json` files (default: discovered `public/data`).
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value = "text")]
    format: Format,
}

fn main() {
    init_logging();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;
    debug!(data_dir = %data_dir.display(), "validating section files");

    let run = run_validation(&section_files(&data_dir));
    match cli.format {
        Format::Text => {
            println!("validating {}\n", data_dir.display());
            print!("{}", run.render_text());
        }
        Format::Json => {
            let report =
                serde_json::to_string_pretty(&run).context("failed to serialize report")?;
            println!("{report}");
        }
    }
    Ok(run.exit_code())
}
