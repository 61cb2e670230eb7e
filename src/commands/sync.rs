//! # Fetch and Pull Command Implementations
//!
//! `fetch` and `pull` share their arguments. Both stream git's output while
//! it runs; with `--all` every line is tagged with the repository nickname.

use anyhow::Result;
use clap::Args;
use repo_watch::actions;

use super::{run_batch, GlobalOpts};

/// Arguments for `fetch` and `pull`
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Nickname of the repository (omit with --all)
    #[arg(value_name = "NICKNAME")]
    pub nickname: Option<String>,

    /// Pass --all to git so every remote is used
    #[arg(long)]
    pub all_remotes: bool,
}

/// Execute the `fetch` command.
pub fn execute_fetch(args: SyncArgs, global: &GlobalOpts) -> Result<()> {
    let all_remotes = args.all_remotes;
    run_batch(global, "fetch", args.nickname, move |ctx, repo| {
        actions::fetch(ctx, repo, all_remotes)
    })
}

/// Execute the `pull` command.
pub fn execute_pull(args: SyncArgs, global: &GlobalOpts) -> Result<()> {
    let all_remotes = args.all_remotes;
    run_batch(global, "pull", args.nickname, move |ctx, repo| {
        actions::pull(ctx, repo, all_remotes)
    })
}
