//! `tabula` - export a JSON table to csv, xlsx and pdf.
//!
//! ```text
//! tabula <input.json> [--out DIR] [--format csv|xlsx|pdf]...
//!        [--sort key[:asc|desc]] [--search field=query] [--settings FILE]
//! ```
//!
//! The input is `{ "columns": [...], "rows": [...] }`.

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;
use tabula::{Column, ExportFormat, Row, SortDirection, SortState, TableEngine, TableSettings};
use tracing::{info, warn};

#[derive(Deserialize)]
struct Document {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

/// Export a JSON table to csv, xlsx and pdf.
#[derive(Parser, Debug)]
#[command(name = "tabula")]
#[command(version)]
#[command(about = "Export a JSON table to csv, xlsx and pdf")]
struct Cli {
    /// Input file of the form `{ "columns": [...], "rows": [...] }`
    input: PathBuf,

    /// Output directory (defaults to the export dir from settings)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Formats to write, repeatable (all when omitted)
    #[arg(long = "format", value_enum)]
    formats: Vec<FormatArg>,

    /// Sort key with optional direction, e.g. `name:desc`
    #[arg(long, value_parser = parse_sort)]
    sort: Option<SortState>,

    /// Search as `field=query`
    #[arg(long, value_parser = parse_search)]
    search: Option<(String, String)>,

    /// Settings file (defaults to the user config dir)
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Csv,
    Xlsx,
    Pdf,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Xlsx => ExportFormat::Xlsx,
            FormatArg::Pdf => ExportFormat::Pdf,
        }
    }
}

fn parse_sort(arg: &str) -> Result<SortState, String> {
    let (key, direction) = match arg.split_once(':') {
        Some((key, "asc")) => (key, SortDirection::Asc),
        Some((key, "desc")) => (key, SortDirection::Desc),
        Some((_, other)) => return Err(format!("unknown sort direction: {}", other)),
        None => (arg, SortDirection::Asc),
    };
    if key.is_empty() {
        return Err("sort key must not be empty".to_string());
    }
    Ok(SortState::new(key, direction))
}

fn parse_search(arg: &str) -> Result<(String, String), String> {
    let (field, query) = arg
        .split_once('=')
        .ok_or_else(|| "search must be field=query".to_string())?;
    Ok((field.to_string(), query.to_string()))
}

fn main() -> Result<()> {
    tabula::logging::init();

    let args = Cli::parse();
    let input = args.input;

    let settings = match &args.settings {
        Some(path) => TableSettings::load(path),
        None => TableSettings::load_default(),
    }
    .context("Failed to load settings")?;

    let content = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let document: Document = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", input.display()))?;

    let mut table = TableEngine::client(document.columns, document.rows, &settings);
    if let Some((field, query)) = args.search {
        table.set_search_field(&field)?;
        table.set_search_query(query);
    }
    if let Some(sort) = args.sort {
        table.set_sort(Some(sort))?;
    }
    info!(rows = table.rows().len(), "{}", table.page_label());

    let out = args.out.unwrap_or_else(|| settings.resolved_export_dir());
    let formats: Vec<ExportFormat> = if args.formats.is_empty() {
        ExportFormat::all().to_vec()
    } else {
        args.formats.into_iter().map(ExportFormat::from).collect()
    };

    let mut failed = false;
    for format in formats {
        match table.export_to(format, &out) {
            Ok(path) => println!("{}", path.display()),
            Err(notice) => {
                warn!(format = format.extension(), "{}", notice);
                eprintln!("{}: {}", format.extension(), notice);
                failed = true;
            }
        }
    }
    if failed {
        bail!("Some exports were not written");
    }
    Ok(())
}
