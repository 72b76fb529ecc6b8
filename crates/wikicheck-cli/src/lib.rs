//! Wikicheck command-line front end.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::info;
use wikicheck_core::{CheckerConfig, FormatRegistry, Wiki, WikiChecker, WikiScanner};

mod report;

pub use report::{DocumentReport, LinkTotals, WikiReport};

#[derive(Debug, Parser)]
#[command(name = "wikicheck")]
#[command(version, about = "Check a wiki for broken, missing and weak links")]
pub struct Cli {
    /// Root directory of the wiki
    #[arg(short, long)]
    pub input: PathBuf,

    /// Configuration file (defaults to wikicheck.yaml in the wiki root)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// More log output, repeat for debug output
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Also list documents that only have warnings
    #[arg(short, long)]
    pub warn: bool,

    /// Skip external link validation
    #[arg(long)]
    pub offline: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Scans and checks the wiki, then writes the report to `out`.
///
/// Returns whether any error was found.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<bool> {
    let mut config = match &cli.config {
        Some(path) => CheckerConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => CheckerConfig::load_from_root(&cli.input)
            .with_context(|| format!("loading configuration from {}", cli.input.display()))?,
    };
    if cli.offline {
        config.checks.external_links = false;
    }

    let registry = FormatRegistry::standard();
    let mut wiki = Wiki::new();
    WikiScanner::new(&registry)
        .scan(&mut wiki, &cli.input)
        .with_context(|| format!("scanning {}", cli.input.display()))?;

    let checker = WikiChecker::standard(registry, &config)?;
    let stats = checker.run(&mut wiki, false).context("checking the wiki")?;
    info!("{} document(s) checked", stats.documents_checked);

    let report = WikiReport::new(&wiki, cli.warn);
    if cli.json {
        report.write_json(out)?;
    } else {
        report.write_text(out)?;
    }

    Ok(wiki.total_error_count() > 0)
}
