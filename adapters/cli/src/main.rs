#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that lints Klotski level catalogs.

mod config;
mod report;

use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use klotski_catalog::{query, Catalog, CatalogLoad, BUNDLED_CATALOG};
use klotski_system_grid_parser::serialize_board;
use log::{debug, info};

use crate::config::{LintConfig, OutputFormat, Settings};
use crate::report::Report;

#[derive(Parser, Debug)]
#[command(name = "klotski-lint", author, version, about, long_about = None)]
struct Args {
    /// Catalog file to lint; the bundled catalog is used when omitted
    catalog: Option<PathBuf>,

    /// TOML lint configuration
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Parse and validate records on every available core
    #[arg(long)]
    parallel: bool,

    /// Fail when an accepted level carries warnings
    #[arg(long)]
    deny_warnings: bool,

    /// Report format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Print the named level in catalog form instead of the report
    #[arg(long, value_name = "NAME")]
    show: Option<String>,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Entry point for the catalog lint command.
fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    debug!("starting with {args:?}");

    let config = args
        .config
        .as_deref()
        .map(LintConfig::load)
        .transpose()?;
    let settings = LintConfig::resolve(
        config.as_ref(),
        args.parallel,
        args.deny_warnings,
        args.format,
    );

    let text = read_catalog(&args)?;
    let load = load_catalog(&text, settings);

    if let Some(name) = &args.show {
        return show_level(&load, name);
    }

    let report = Report::new(&load);
    match settings.format {
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    if report.has_failures() || (settings.deny_warnings && report.has_warnings()) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn read_catalog(args: &Args) -> Result<String> {
    match &args.catalog {
        Some(path) => {
            info!("linting catalog {}", path.display());
            fs::read_to_string(path)
                .with_context(|| format!("failed to read catalog at {}", path.display()))
        }
        None => {
            info!("linting the bundled catalog");
            Ok(BUNDLED_CATALOG.to_owned())
        }
    }
}

fn load_catalog(text: &str, settings: Settings) -> CatalogLoad {
    if settings.parallel {
        Catalog::load_parallel(text)
    } else {
        Catalog::load(text)
    }
}

fn show_level(load: &CatalogLoad, name: &str) -> Result<ExitCode> {
    if let Some(board) = query::board_named(load, name) {
        print!("{}", serialize_board(board.board()));
        return Ok(ExitCode::SUCCESS);
    }

    match query::failure_named(load, name) {
        Some(failure) => bail!(
            "level '{name}' (line {}) failed to load: {}",
            failure.line,
            failure.problem
        ),
        None => bail!("no level named '{name}' in the catalog"),
    }
}
