//! # repo-watch Library
//!
//! This library provides the batch repository-operation engine behind the
//! `repo-watch` command-line tool: given a declarative list of named
//! checkouts, it runs clone, fetch, pull, diff, exec and edit against one or
//! all of them and reports what happened.
//!
//! ## Quick Example
//!
//! ```
//! use repo_watch::config;
//! use repo_watch::dispatch::{self, Outcome, Selector};
//! use repo_watch::output::{JsonSink, Sink};
//!
//! let registry = config::parse(r#"
//! rootFolder: /srv/code
//! repositories:
//!   - nickname: api
//!     folderName: api
//!     url: https://example.com/api.git
//!   - nickname: web
//!     folderName: web
//!     url: https://example.com/web.git
//! "#).unwrap();
//!
//! let sink = JsonSink::new();
//! let report = dispatch::run(&Selector::All, &registry, &sink, |repo| {
//!     Outcome::ok(&repo.nickname, "checked")
//! });
//!
//! assert_eq!(report.succeeded(), 2);
//! assert_eq!(sink.lines().len(), 2);
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: the `Registry` of `Repository` descriptors
//!   plus `rootFolder`, `editCommand` and `timeoutSeconds`.
//! - **Path resolution (`path`)**: where a repository lives on disk.
//! - **Process runner (`process`)**: runs external commands in capture,
//!   stream or inherit mode, with a timeout, behind a mockable trait.
//! - **Output sinks (`output`)**: text or JSON accumulation of result lines,
//!   rendered once at the end of a command.
//! - **Dispatcher (`dispatch`)**: resolves a `Selector` and fans an action out
//!   over the targets, one task per repository, joining on all of them.
//! - **Actions (`actions`, `git`)**: clone, fetch, pull, diff, remote diff,
//!   exec, edit and init, each turning process results into an `Outcome`.
//!
//! ## Execution Flow
//!
//! 1.  Load the registry (a failure here is fatal to the invocation).
//! 2.  Derive a `Selector` from the nickname argument and `--all`.
//! 3.  `dispatch::run` resolves targets and applies the action to each.
//! 4.  Every outcome is appended to the sink; the sink renders once.

pub mod actions;
pub mod config;
pub mod defaults;
pub mod dispatch;
pub mod error;
pub mod git;
pub mod output;
pub mod path;
pub mod process;
pub mod suggestions;

#[cfg(test)]
mod dispatch_proptest;
