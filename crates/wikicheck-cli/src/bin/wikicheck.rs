//! Wikicheck Binary Entry Point

use std::process::ExitCode;

use clap::Parser;
use wikicheck_cli::{run, Cli};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    let has_errors = run(&cli, &mut std::io::stdout().lock())?;
    Ok(if has_errors {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
