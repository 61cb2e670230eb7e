//! # Diff Command Implementations
//!
//! - `diff` shows uncommitted changes (`git diff`) for one or all
//!   repositories. A clean working tree is reported as "No changes".
//! - `rdiff` fetches, finds the current branch and diffs it against
//!   `origin/<branch>`. A failure names the step it happened in.
//!
//! Both capture git's output and report it through the sink, so `--json`
//! returns the diff text inside `messages`.

use anyhow::Result;
use clap::Args;
use repo_watch::actions;

use super::{run_batch, GlobalOpts};

/// Arguments for `diff` and `rdiff`
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Nickname of the repository (omit with --all)
    #[arg(value_name = "NICKNAME")]
    pub nickname: Option<String>,
}

/// Execute the `diff` command.
pub fn execute(args: DiffArgs, global: &GlobalOpts) -> Result<()> {
    run_batch(global, "diff", args.nickname, actions::diff)
}

/// Execute the `rdiff` command.
pub fn execute_remote(args: DiffArgs, global: &GlobalOpts) -> Result<()> {
    run_batch(global, "rdiff", args.nickname, actions::remote_diff)
}
