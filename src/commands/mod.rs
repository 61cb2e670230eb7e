//! # CLI Command Implementations
//!
//! Each subcommand lives in its own file with an `Args` struct derived using
//! `clap` and an `execute` function. Batch subcommands share [`run_batch`],
//! which loads the registry, derives the selector, dispatches the action and
//! renders the sink.
//!
//! Process-wide settings travel in an explicit [`GlobalOpts`] value; nothing
//! here reads or writes global state.

pub mod add;
pub mod clone;
pub mod completions;
pub mod diff;
pub mod edit;
pub mod exec;
pub mod init;
pub mod list;
pub mod sync;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use repo_watch::actions::ActionContext;
use repo_watch::config::{self, Registry, Repository};
use repo_watch::defaults;
use repo_watch::dispatch::{self, Outcome, Selector};
use repo_watch::output::{OutputConfig, OutputFormat, Sink};
use repo_watch::process::SystemRunner;
use repo_watch::suggestions;

/// Flags shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalOpts {
    pub config_path: PathBuf,
    pub all: bool,
    pub json: bool,
    pub timeout: Option<u64>,
    pub output: OutputConfig,
}

impl GlobalOpts {
    /// Load the registry. Failing here aborts the whole invocation.
    pub fn load_registry(&self) -> Result<Registry> {
        if !self.config_path.exists() {
            return Err(suggestions::config_not_found(&self.config_path));
        }
        config::from_file(&self.config_path).map_err(|e| {
            anyhow::anyhow!(
                "Failed to load config from {}: {}",
                self.config_path.display(),
                e
            )
        })
    }

    pub fn sink(&self) -> Box<dyn Sink> {
        OutputFormat::from_json_flag(self.json).sink(self.output.clone())
    }

    /// Action settings for `registry`, with the process timeout resolved.
    pub fn context(&self, registry: &Registry) -> ActionContext {
        let timeout = defaults::effective_timeout(self.timeout, registry.timeout_seconds);
        ActionContext::new(registry, Arc::new(SystemRunner::new(timeout))).structured(self.json)
    }
}

/// Load, select, dispatch, render.
///
/// Per-repository failures are reported through the sink and do not change
/// the exit status.
pub fn run_batch<F>(
    global: &GlobalOpts,
    command: &str,
    nickname: Option<String>,
    action: F,
) -> Result<()>
where
    F: Fn(&ActionContext, &Repository) -> Outcome + Sync + Send,
{
    let selector = Selector::from_args(nickname, global.all)
        .ok_or_else(|| suggestions::missing_selector(command))?;
    let registry = global.load_registry()?;
    dispatch_on(global, &registry, &selector, action)
}

/// Dispatch `action` over an already loaded registry and render the sink.
pub fn dispatch_on<F>(
    global: &GlobalOpts,
    registry: &Registry,
    selector: &Selector,
    action: F,
) -> Result<()>
where
    F: Fn(&ActionContext, &Repository) -> Outcome + Sync + Send,
{
    let ctx = global.context(registry).batch(selector.is_all());

    let sink = global.sink();
    dispatch::run(selector, registry, sink.as_ref(), |repo| action(&ctx, repo));
    sink.output()?;
    Ok(())
}
