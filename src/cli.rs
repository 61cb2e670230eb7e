//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use repo_watch::defaults;
use repo_watch::output::OutputConfig;

use crate::commands::{self, GlobalOpts};

/// repo-watch - Batch git operations across your configured checkouts
#[derive(Parser, Debug)]
#[command(name = "repo-watch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Path to the configuration file
    #[arg(long, global = true, value_name = "FILE", env = defaults::CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Apply the command to every configured repository
    #[arg(short, long, global = true)]
    all: bool,

    /// Print results as a single JSON object
    #[arg(long, global = true)]
    json: bool,

    /// Kill external commands after this many seconds (0 disables)
    #[arg(long, global = true, value_name = "SECS", env = defaults::TIMEOUT_ENV)]
    timeout: Option<u64>,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List configured repositories
    List,
    /// Clone a repository (or all with --all)
    Clone(commands::clone::CloneArgs),
    /// Fetch a repository (or all with --all)
    Fetch(commands::sync::SyncArgs),
    /// Pull a repository (or all with --all)
    Pull(commands::sync::SyncArgs),
    /// Show uncommitted changes
    Diff(commands::diff::DiffArgs),
    /// Show differences between the current branch and origin
    Rdiff(commands::diff::DiffArgs),
    /// Open a repository with the configured editor
    Edit(commands::edit::EditArgs),
    /// Run a command inside a repository's folder
    Exec(commands::exec::ExecArgs),
    /// Add a repository to the configuration
    Add(commands::add::AddArgs),
    /// Add a repository, create its folder and run git init
    Create(commands::add::AddArgs),
    /// Write an example configuration file
    Init(commands::init::InitArgs),
    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        let global = GlobalOpts {
            config_path: self.config.unwrap_or_else(defaults::default_config_path),
            all: self.all,
            json: self.json,
            timeout: self.timeout,
            output: OutputConfig::from_env_and_flag(&self.color),
        };

        match self.command {
            Commands::List => commands::list::execute(&global),
            Commands::Clone(args) => commands::clone::execute(args, &global),
            Commands::Fetch(args) => commands::sync::execute_fetch(args, &global),
            Commands::Pull(args) => commands::sync::execute_pull(args, &global),
            Commands::Diff(args) => commands::diff::execute(args, &global),
            Commands::Rdiff(args) => commands::diff::execute_remote(args, &global),
            Commands::Edit(args) => commands::edit::execute(args, &global),
            Commands::Exec(args) => commands::exec::execute(args, &global),
            Commands::Add(args) => commands::add::execute(args, &global),
            Commands::Create(args) => commands::add::execute_create(args, &global),
            Commands::Init(args) => commands::init::execute(args, &global),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// `RUST_LOG` wins over `--log-level` when set. Logs go to stderr.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
