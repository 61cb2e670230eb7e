//! # Exec Command Implementation
//!
//! Runs an arbitrary command with the repository folder as working
//! directory.
//!
//! ```bash
//! repo-watch exec api git log --oneline -5
//! repo-watch exec --all -- git status --short
//! repo-watch exec --shell api 'git log | head -3'
//! ```
//!
//! Without `--all` the first word is the nickname. With `--all` the first
//! word is still taken as a nickname when one is configured under that name,
//! which narrows the run to that repository; otherwise every word belongs to
//! the command. Arguments are passed verbatim unless `--shell` is given.

use anyhow::Result;
use clap::Args;
use repo_watch::actions;
use repo_watch::dispatch::Selector;
use repo_watch::suggestions;

use super::{dispatch_on, GlobalOpts};

/// Run a command inside a repository's folder
#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Run the command through the platform shell (sh -c / cmd /C)
    #[arg(long)]
    pub shell: bool,

    /// `<NICKNAME> <COMMAND>...`, or just `<COMMAND>...` with --all
    #[arg(
        value_name = "NICKNAME> <COMMAND",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub words: Vec<String>,
}

/// Split the positional words into the nickname and the command.
fn split_words(
    words: Vec<String>,
    all: bool,
    is_nickname: impl Fn(&str) -> bool,
) -> (Option<String>, Vec<String>) {
    if all && !words.first().is_some_and(|w| is_nickname(w.as_str())) {
        return (None, words);
    }
    let mut words = words.into_iter();
    let nickname = words.next();
    (nickname, words.collect())
}

/// Execute the `exec` command.
pub fn execute(args: ExecArgs, global: &GlobalOpts) -> Result<()> {
    let registry = global.load_registry()?;
    let (nickname, command) =
        split_words(args.words, global.all, |w| registry.find(w).is_some());
    if command.is_empty() {
        anyhow::bail!(
            "No command given\n\n\
             hint: repo-watch exec <nickname> <command>...\n\
             hint: repo-watch exec --all -- <command>..."
        );
    }

    let selector = Selector::from_args(nickname, global.all)
        .ok_or_else(|| suggestions::missing_selector("exec"))?;
    let shell = args.shell;
    dispatch_on(global, &registry, &selector, move |ctx, repo| {
        actions::exec(ctx, repo, &command, shell)
    })
}
