//! # Clone Command Implementation
//!
//! Clones a repository into `rootFolder/folderName`, or every repository with
//! `--all`. Repositories whose folder already exists are reported and
//! skipped. Sparse repositories are cloned with `git clone --sparse`.

use anyhow::Result;
use clap::Args;
use repo_watch::actions;

use super::{run_batch, GlobalOpts};

/// Clone a repository
#[derive(Args, Debug)]
pub struct CloneArgs {
    /// Nickname of the repository (omit with --all)
    #[arg(value_name = "NICKNAME")]
    pub nickname: Option<String>,
}

/// Execute the `clone` command.
pub fn execute(args: CloneArgs, global: &GlobalOpts) -> Result<()> {
    run_batch(global, "clone", args.nickname, actions::clone)
}
