//! # Action Library
//!
//! The per-repository operations the batch dispatcher applies. Each action
//! resolves the repository's working directory, runs one or more external
//! commands through the [`ProcessRunner`] held by the [`ActionContext`], and
//! converts whatever happened into an [`Outcome`]. Actions never return
//! errors and never panic on process failure; a failure is just an outcome
//! with `success == false`.
//!
//! | Action | Command |
//! |---|---|
//! | [`clone`] | `git clone [--sparse] <url> <path>` (skipped when the path exists) |
//! | [`fetch`] | `git -C <path> fetch [--all]` |
//! | [`pull`] | `git -C <path> pull [--all]` |
//! | [`diff`] | `git -C <path> diff` (captured) |
//! | [`remote_diff`] | fetch, `rev-parse --abbrev-ref HEAD`, `diff <b> origin/<b>` |
//! | [`exec`] | arbitrary argv, cwd at the path |
//! | [`edit`] | `<editCommand> <path>`, cwd at the path |
//! | [`init`] | `mkdir -p <path>` then `git init <path>` |

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{Registry, Repository};
use crate::dispatch::Outcome;
use crate::git;
use crate::path;
use crate::process::{CommandSpec, ExitFailure, OutputMode, ProcessRunner};

/// Settings every action needs, passed explicitly at call time.
#[derive(Clone)]
pub struct ActionContext {
    /// Root folder, already `~`-expanded.
    pub root: PathBuf,
    pub edit_command: String,
    pub runner: Arc<dyn ProcessRunner>,
    /// Several repositories run at once: tag streamed lines with the
    /// nickname and do not hand the terminal to any one child.
    pub batch: bool,
    /// Structured output was requested: keep stdout for the sink.
    pub structured: bool,
}

impl ActionContext {
    pub fn new(registry: &Registry, runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            root: registry.root(),
            edit_command: registry.edit_command.clone(),
            runner,
            batch: false,
            structured: false,
        }
    }

    pub fn batch(mut self, batch: bool) -> Self {
        self.batch = batch;
        self
    }

    pub fn structured(mut self, structured: bool) -> Self {
        self.structured = structured;
        self
    }

    /// Working directory of `repository`.
    pub fn path_of(&self, repository: &Repository) -> PathBuf {
        path::resolve(repository, &self.root)
    }

    /// Live output for long-running git commands.
    fn stream_mode(&self, repository: &Repository) -> OutputMode {
        OutputMode::Stream {
            prefix: self
                .batch
                .then(|| format!("[{}] ", repository.nickname)),
            stdout_to_stderr: self.structured,
        }
    }

    /// Interactive programs get the terminal unless several run at once.
    fn interactive_mode(&self, repository: &Repository) -> OutputMode {
        if self.batch || self.structured {
            self.stream_mode(repository)
        } else {
            OutputMode::Inherit
        }
    }

    /// The editor always gets the terminal when it opens one repository,
    /// whatever format the results are rendered in.
    fn editor_mode(&self, repository: &Repository) -> OutputMode {
        if self.batch {
            self.stream_mode(repository)
        } else {
            OutputMode::Inherit
        }
    }
}

fn failure_message(context: &str, err: &ExitFailure) -> String {
    match git::auth_hint(&err.detail) {
        Some(hint) => format!("{}: {}\n  hint: {}", context, err, hint),
        None => format!("{}: {}", context, err),
    }
}

/// Clone the repository unless its directory already exists.
pub fn clone(ctx: &ActionContext, repository: &Repository) -> Outcome {
    let target = ctx.path_of(repository);
    if target.exists() {
        return Outcome::ok(
            &repository.nickname,
            format!("Repository already exists at {}", target.display()),
        );
    }

    let spec = git::clone(repository, &target);
    match ctx.runner.run(&spec, &ctx.stream_mode(repository)) {
        Ok(_) => Outcome::ok(
            &repository.nickname,
            format!("Cloned repository into {}", target.display()),
        ),
        Err(e) => Outcome::failed(
            &repository.nickname,
            failure_message("Failed to clone repository", &e),
        ),
    }
}

/// Fetch from the default remote, or every remote with `all_remotes`.
pub fn fetch(ctx: &ActionContext, repository: &Repository, all_remotes: bool) -> Outcome {
    let spec = git::fetch(&ctx.path_of(repository), all_remotes);
    match ctx.runner.run(&spec, &ctx.stream_mode(repository)) {
        Ok(_) => Outcome::ok(&repository.nickname, "Fetched changes"),
        Err(e) => Outcome::failed(
            &repository.nickname,
            failure_message("Failed to fetch changes", &e),
        ),
    }
}

/// Pull into the current branch.
pub fn pull(ctx: &ActionContext, repository: &Repository, all_remotes: bool) -> Outcome {
    let spec = git::pull(&ctx.path_of(repository), all_remotes);
    match ctx.runner.run(&spec, &ctx.stream_mode(repository)) {
        Ok(_) => Outcome::ok(&repository.nickname, "Pulled changes"),
        Err(e) => Outcome::failed(
            &repository.nickname,
            failure_message("Failed to pull changes", &e),
        ),
    }
}

/// Uncommitted changes in the working tree. An empty diff is a success.
pub fn diff(ctx: &ActionContext, repository: &Repository) -> Outcome {
    let spec = git::diff(&ctx.path_of(repository));
    match ctx.runner.run(&spec, &OutputMode::Capture) {
        Ok(out) if out.trim().is_empty() => Outcome::ok(&repository.nickname, "No changes"),
        Ok(out) => Outcome::ok(&repository.nickname, out),
        Err(e) => Outcome::failed(
            &repository.nickname,
            failure_message("Failed to show diff", &e),
        ),
    }
}

/// Steps of [`remote_diff`], named in failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteDiffStep {
    Fetch,
    CurrentBranch,
    Diff,
}

impl RemoteDiffStep {
    fn name(self) -> &'static str {
        match self {
            RemoteDiffStep::Fetch => "fetch",
            RemoteDiffStep::CurrentBranch => "current branch",
            RemoteDiffStep::Diff => "diff",
        }
    }
}

/// Fetch, find the current branch, then diff it against its `origin`
/// counterpart. A failed step skips the rest for this repository.
pub fn remote_diff(ctx: &ActionContext, repository: &Repository) -> Outcome {
    let path = ctx.path_of(repository);
    let fail = |step: RemoteDiffStep, err: &ExitFailure| {
        Outcome::failed(
            &repository.nickname,
            failure_message(&format!("Remote diff failed at step '{}'", step.name()), err),
        )
    };

    if let Err(e) = ctx.runner.run(&git::fetch(&path, true), &OutputMode::Capture) {
        return fail(RemoteDiffStep::Fetch, &e);
    }

    let branch = match ctx
        .runner
        .run(&git::current_branch(&path), &OutputMode::Capture)
    {
        Ok(out) => out.trim().to_string(),
        Err(e) => return fail(RemoteDiffStep::CurrentBranch, &e),
    };
    if branch.is_empty() || branch == "HEAD" {
        return Outcome::failed(
            &repository.nickname,
            "Remote diff failed at step 'current branch': not on a branch (detached HEAD)",
        );
    }

    let spec = git::diff_against_remote(&path, &branch, git::DEFAULT_REMOTE);
    match ctx.runner.run(&spec, &OutputMode::Capture) {
        Ok(out) if out.trim().is_empty() => Outcome::ok(
            &repository.nickname,
            format!("No differences between {0} and {1}/{0}", branch, git::DEFAULT_REMOTE),
        ),
        Ok(out) => Outcome::ok(&repository.nickname, out),
        Err(e) => fail(RemoteDiffStep::Diff, &e),
    }
}

/// Run `argv` in the repository directory.
///
/// The argument vector is passed through verbatim. With `shell`, the words
/// are joined with spaces and handed to the platform shell instead.
pub fn exec(ctx: &ActionContext, repository: &Repository, argv: &[String], shell: bool) -> Outcome {
    let Some((program, args)) = argv.split_first() else {
        return Outcome::failed(&repository.nickname, "No command given");
    };

    let dir = ctx.path_of(repository);
    if !dir.is_dir() {
        return Outcome::failed(
            &repository.nickname,
            format!("Repository folder does not exist: {}", dir.display()),
        );
    }

    let spec = if shell {
        CommandSpec::shell(&argv.join(" "))
    } else {
        CommandSpec::new(program.as_str()).args(args.iter().cloned())
    }
    .current_dir(&dir);

    match ctx.runner.run(&spec, &ctx.interactive_mode(repository)) {
        Ok(_) => Outcome::ok(&repository.nickname, format!("Ran `{}`", spec)),
        Err(e) => Outcome::failed(
            &repository.nickname,
            failure_message("Failed to execute command", &e),
        ),
    }
}

/// Open the repository with the configured editor command.
///
/// `editCommand` is split on whitespace; the repository path is appended as
/// the last argument and also used as the working directory.
pub fn edit(ctx: &ActionContext, repository: &Repository) -> Outcome {
    let mut words = ctx.edit_command.split_whitespace();
    let Some(program) = words.next() else {
        return Outcome::failed(
            &repository.nickname,
            "No editCommand configured; add 'editCommand: <editor>' to the config",
        );
    };

    let dir = ctx.path_of(repository);
    if !dir.is_dir() {
        return Outcome::failed(
            &repository.nickname,
            format!("Repository folder does not exist: {}", dir.display()),
        );
    }

    let spec = CommandSpec::new(program)
        .args(words)
        .arg(dir.to_string_lossy())
        .current_dir(&dir);

    match ctx.runner.run(&spec, &ctx.editor_mode(repository)) {
        Ok(_) => Outcome::ok(&repository.nickname, format!("Opened with {}", program)),
        Err(e) => Outcome::failed(
            &repository.nickname,
            failure_message("Failed to open editor", &e),
        ),
    }
}

/// Create the repository directory and initialise an empty git repository.
pub fn init(ctx: &ActionContext, repository: &Repository) -> Outcome {
    let dir = ctx.path_of(repository);
    if let Err(e) = fs::create_dir_all(&dir) {
        return Outcome::failed(
            &repository.nickname,
            format!("Failed to create {}: {}", dir.display(), e),
        );
    }

    match ctx.runner.run(&git::init(&dir), &OutputMode::Capture) {
        Ok(_) => Outcome::ok(
            &repository.nickname,
            format!("Initialized empty repository in {}", dir.display()),
        ),
        Err(e) => Outcome::failed(
            &repository.nickname,
            failure_message("Failed to initialize repository", &e),
        ),
    }
}
