//! # Edit Command Implementation
//!
//! Opens one repository with `editCommand`. The editor gets the terminal; a
//! non-zero exit is reported as a failure.

use anyhow::Result;
use clap::Args;
use repo_watch::actions;

use super::{run_batch, GlobalOpts};

/// Open a repository in the configured editor
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Nickname of the repository
    #[arg(value_name = "NICKNAME")]
    pub nickname: String,
}

/// Execute the `edit` command.
pub fn execute(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    // Editors are interactive; `--all` would open every repository at once.
    let global = GlobalOpts {
        all: false,
        ..global.clone()
    };
    run_batch(&global, "edit", Some(args.nickname), actions::edit)
}
