//! Print one catalog section as a plain-text table.
//!
//! Sections load through the same validate-then-normalize path as the site,
//! either from the data directory or from a deployed base URL. Category and
//! search filters combine with AND; `--sort` names a column id or header.

use anyhow::{Context, Result, bail};
use clap::Parser;
use osint_catalog::table::render_plain;
use osint_catalog::{
    CategoryFilter, ColumnSpec, FileSource, HttpSource, LoadStatus, Record, SearchFilter,
    Section, SectionKind, SectionLoader, SectionSource, SortState, build_category_coverage,
    build_view, init_logging, resolve_data_dir, section_columns, split_list,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "catalog-table",
    version,
    about = "Print a catalog section as a sortable, filterable table"
)]
struct Cli {
    /// Section name, e.g. `indexed_internet` or `archived-web`.
    section: String,

    /// Directory holding `<section>.json` files (default: discovered `public/data`).
    #[arg(long, value_name = "PATH", conflicts_with = "url")]
    data_dir: Option<PathBuf>,

    /// Base URL of a deployed catalog; fetches `<URL>/data/<section>.json`.
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Category codes to keep (comma separated, repeatable).
    #[arg(long = "category", value_name = "CODES")]
    categories: Vec<String>,

    /// Case-insensitive text matched against tool names and descriptions.
    #[arg(long, value_name = "TEXT")]
    search: Option<String>,

    /// Column id or header to sort by.
    #[arg(long, value_name = "COLUMN")]
    sort: Option<String>,

    /// Sort descending instead of ascending.
    #[arg(long, requires = "sort")]
    desc: bool,

    /// List the section's categories and the tools tagged with each instead
    /// of printing the table.
    #[arg(long)]
    list_categories: bool,
}

#[tokio::main]
async fn main() {
    init_logging();
    if let Err(err) = run().await {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let Some(kind) = SectionKind::parse(&cli.section) else {
        let known: Vec<&str> = SectionKind::ALL.iter().map(|kind| kind.as_str()).collect();
        bail!(
            "unknown section '{}'; expected one of: {}",
            cli.section,
            known.join(", ")
        );
    };

    let section = match &cli.url {
        Some(url) => load(HttpSource::new(url)?, kind).await?,
        None => {
            let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;
            load(FileSource::new(data_dir), kind).await?
        }
    };

    if cli.list_categories {
        print_categories(&section);
        return Ok(());
    }

    let columns = section_columns(kind);
    let sort = match &cli.sort {
        Some(name) => {
            let column = find_column(&columns, name)?;
            if cli.desc {
                SortState::descending(column.id.clone())
            } else {
                SortState::ascending(column.id.clone())
            }
        }
        None => SortState::unsorted(),
    };
    let categories = CategoryFilter::new(cli.categories.iter().flat_map(|raw| split_list(raw)));
    let search = SearchFilter::new(cli.search.as_deref().unwrap_or_default());

    let view = build_view(&section.records, &columns, &sort, |record| {
        categories.matches_row(record) && search.matches_row(record)
    });

    println!("{}", kind.title());
    for line in render_plain(&view, &columns) {
        println!("{line}");
    }
    println!("\n{} of {} records", view.len(), section.records.len());
    Ok(())
}

async fn load<S: SectionSource>(source: S, kind: SectionKind) -> Result<Section> {
    let loader = SectionLoader::new(Arc::new(source), kind);
    loader
        .refetch()
        .await
        .context("section load task failed")?;
    let state = loader.state();
    debug!(section = %kind, status = ?state.status, "load settled");
    match (state.status, state.error, state.metadata) {
        (_, Some(err), _) => Err(err).with_context(|| format!("failed to load {kind}")),
        (LoadStatus::Ready, None, Some(categories)) => Ok(Section {
            kind,
            categories,
            records: state.records,
        }),
        _ => bail!("{kind} did not finish loading"),
    }
}

fn find_column<'a>(columns: &'a [ColumnSpec<Record>], name: &str) -> Result<&'a ColumnSpec<Record>> {
    let wanted = name.trim().to_lowercase();
    columns
        .iter()
        .find(|column| {
            column.id.to_lowercase() == wanted || column.header_label().to_lowercase() == wanted
        })
        .with_context(|| {
            let ids: Vec<&str> = columns.iter().map(|column| column.id.as_str()).collect();
            format!("unknown column '{name}'; columns: {}", ids.join(", "))
        })
}

fn print_categories(section: &Section) {
    println!("{} categories", section.kind.title());
    for (code, entry) in build_category_coverage(section) {
        let tools = if entry.used {
            entry.tools.join(", ")
        } else {
            "(unused)".to_string()
        };
        println!("{:<8} {:<28} {tools}", code.display(), entry.name);
    }
}
