//! Jarscope CLI - Command-line utility reporting the nested structure and
//! checksums of Java enterprise archives.

mod cli;
mod commands;
mod error;
mod logging;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    if let Some(shell) = cli.completions {
        commands::completion::execute(shell);
        return Ok(());
    }

    logging::init(cli.verbose);

    let formatter = output::create_formatter(cli.json);
    commands::scan::execute(&cli, &*formatter)
}
