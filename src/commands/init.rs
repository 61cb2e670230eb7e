//! # Init Command Implementation
//!
//! Writes an example configuration to the config path (the default location,
//! `--config` or `REPO_WATCH_CONFIG`). Refuses to overwrite an existing file
//! unless `--force` is given. `--print` writes the example to stdout instead.

use std::fs;

use anyhow::{Context, Result};
use clap::Args;
use repo_watch::defaults::EXAMPLE_CONFIG;
use repo_watch::suggestions;

use super::GlobalOpts;

/// Write an example configuration file
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Print the example configuration instead of writing it
    #[arg(long)]
    pub print: bool,

    /// Overwrite an existing configuration file
    #[arg(short, long)]
    pub force: bool,
}

/// Execute the `init` command.
pub fn execute(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    if args.print {
        print!("{}", EXAMPLE_CONFIG);
        return Ok(());
    }

    let path = &global.config_path;
    if path.exists() && !args.force {
        return Err(suggestions::config_exists(path));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    let sink = global.sink();
    sink.add_line(&format!("Wrote example configuration to {}", path.display()));
    sink.output()?;
    Ok(())
}
