//! # Batch Dispatcher
//!
//! The dispatcher is the one place where "do this to one repository" becomes
//! "do this to some or all repositories". Every batch subcommand funnels
//! through [`run`] with a [`Selector`] and a per-repository action.
//!
//! ## Execution
//!
//! 1.  **Resolution**: `Single(name)` finds the first repository with that
//!     nickname; a miss is reported to the sink as a normal message and no
//!     action runs. `All` takes every repository in registry order.
//!
//! 2.  **Fan-out**: one target runs inline on the calling thread. Several
//!     targets run on a dedicated rayon pool with one worker per repository,
//!     each repository as its own task. Tasks block on external processes,
//!     so the pool is sized by target count rather than CPU count.
//!
//! 3.  **Fan-in**: `run` returns only after every task has produced an
//!     [`Outcome`]. A failing or panicking action becomes a failed outcome for
//!     that repository alone; siblings keep running.
//!
//! Outcomes are appended to the sink as they complete, so their relative
//! order across repositories is not fixed. The returned [`BatchReport`] keeps
//! registry order.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use log::{debug, warn};
use rayon::prelude::*;

use crate::config::{Registry, Repository};
use crate::output::Sink;

/// Which repositories a command applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Single(String),
    All,
}

impl Selector {
    /// Derive a selector from a positional nickname and the `--all` flag.
    ///
    /// A nickname takes precedence over `--all`. Returns `None` when neither
    /// was given.
    pub fn from_args(nickname: Option<String>, all: bool) -> Option<Self> {
        match nickname {
            Some(name) => Some(Selector::Single(name)),
            None if all => Some(Selector::All),
            None => None,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selector::All)
    }
}

/// The result of applying one action to one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Nickname of the repository.
    pub repository: String,
    pub success: bool,
    pub message: Option<String>,
}

impl Outcome {
    pub fn ok(repository: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn failed(repository: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            success: false,
            message: Some(message.into()),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) if message.contains('\n') => {
                write!(f, "{}:\n{}", self.repository, message.trim_end())
            }
            Some(message) => write!(f, "{}: {}", self.repository, message),
            None if self.success => write!(f, "{}: done", self.repository),
            None => write!(f, "{}: failed", self.repository),
        }
    }
}

/// Targets a selector resolved to.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution<'a> {
    NotFound(String),
    Targets(Vec<&'a Repository>),
}

/// Resolve `selector` against `registry` without running anything.
pub fn resolve<'a>(selector: &Selector, registry: &'a Registry) -> Resolution<'a> {
    match selector {
        Selector::Single(name) => match registry.find(name) {
            Some(repo) => Resolution::Targets(vec![repo]),
            None => Resolution::NotFound(name.clone()),
        },
        Selector::All => Resolution::Targets(registry.repositories.iter().collect()),
    }
}

/// Everything one batch produced.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// One outcome per resolved repository, in registry order.
    pub outcomes: Vec<Outcome>,
    /// Set when a `Single` selector named an unknown repository.
    pub not_found: Option<String>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.success).count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

/// Apply `action` to every repository `selector` resolves to.
///
/// Never short-circuits: each target yields exactly one outcome, and the
/// call returns once all of them have.
pub fn run<F>(selector: &Selector, registry: &Registry, sink: &dyn Sink, action: F) -> BatchReport
where
    F: Fn(&Repository) -> Outcome + Sync + Send,
{
    let targets = match resolve(selector, registry) {
        Resolution::NotFound(name) => {
            debug!("No repository named '{}'", name);
            sink.add_line(&format!("Repository not found in config: {}", name));
            return BatchReport {
                outcomes: Vec::new(),
                not_found: Some(name),
            };
        }
        Resolution::Targets(targets) => targets,
    };

    debug!("Dispatching to {} repositories", targets.len());
    let outcomes = match targets.len() {
        0 => Vec::new(),
        1 => vec![run_one(targets[0], sink, &action)],
        _ => run_concurrently(&targets, sink, &action),
    };

    let report = BatchReport {
        outcomes,
        not_found: None,
    };
    if report.has_failures() {
        warn!(
            "{} of {} repositories failed",
            report.failed(),
            report.outcomes.len()
        );
    }
    report
}

fn run_concurrently<F>(targets: &[&Repository], sink: &dyn Sink, action: &F) -> Vec<Outcome>
where
    F: Fn(&Repository) -> Outcome + Sync + Send,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(targets.len())
        .thread_name(|i| format!("repo-watch-{}", i))
        .build();

    match pool {
        Ok(pool) => pool.install(|| {
            targets
                .par_iter()
                .with_max_len(1)
                .map(|repo| run_one(repo, sink, action))
                .collect()
        }),
        Err(e) => {
            warn!("Could not start worker pool ({}); running sequentially", e);
            targets
                .iter()
                .map(|repo| run_one(repo, sink, action))
                .collect()
        }
    }
}

fn run_one<F>(repo: &Repository, sink: &dyn Sink, action: &F) -> Outcome
where
    F: Fn(&Repository) -> Outcome,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| action(repo))).unwrap_or_else(|payload| {
        Outcome::failed(
            &repo.nickname,
            format!("action panicked: {}", panic_message(payload.as_ref())),
        )
    });
    sink.add_outcome(&outcome);
    outcome
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
