//! # repo-watch CLI
//!
//! Binary entry point. Parses arguments with `clap`, sets up logging and
//! hands off to the subcommand. All repository logic lives in the
//! `repo_watch` library; this binary is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
