//! Builders for the `git` command lines repo-watch runs.
//!
//! Nothing here spawns a process. The functions only assemble
//! [`CommandSpec`]s so that the exact argument vectors can be asserted in
//! tests. All repository-scoped commands use `git -C <path>` rather than a
//! working directory, matching what a user would type.

use std::path::Path;

use crate::config::Repository;
use crate::process::CommandSpec;

/// The git executable.
pub const GIT: &str = "git";

/// The remote compared against by `rdiff`.
pub const DEFAULT_REMOTE: &str = "origin";

fn in_repo(path: &Path) -> CommandSpec {
    CommandSpec::new(GIT).args(["-C".to_string(), path.to_string_lossy().into_owned()])
}

/// `git clone [--sparse] <url> <path>`
pub fn clone(repository: &Repository, target: &Path) -> CommandSpec {
    let mut spec = CommandSpec::new(GIT).arg("clone");
    if repository.sparse {
        spec = spec.arg("--sparse");
    }
    spec.arg(repository.url.as_str())
        .arg(target.to_string_lossy())
}

/// `git -C <path> fetch [--all]`
pub fn fetch(path: &Path, all_remotes: bool) -> CommandSpec {
    let spec = in_repo(path).arg("fetch");
    if all_remotes {
        spec.arg("--all")
    } else {
        spec
    }
}

/// `git -C <path> pull [--all]`
pub fn pull(path: &Path, all_remotes: bool) -> CommandSpec {
    let spec = in_repo(path).arg("pull");
    if all_remotes {
        spec.arg("--all")
    } else {
        spec
    }
}

/// `git -C <path> diff`
pub fn diff(path: &Path) -> CommandSpec {
    in_repo(path).arg("diff")
}

/// `git -C <path> rev-parse --abbrev-ref HEAD`
pub fn current_branch(path: &Path) -> CommandSpec {
    in_repo(path).args(["rev-parse", "--abbrev-ref", "HEAD"])
}

/// `git -C <path> diff <branch> <remote>/<branch>`
pub fn diff_against_remote(path: &Path, branch: &str, remote: &str) -> CommandSpec {
    in_repo(path)
        .arg("diff")
        .arg(branch)
        .arg(format!("{}/{}", remote, branch))
}

/// `git init <path>`
pub fn init(path: &Path) -> CommandSpec {
    CommandSpec::new(GIT).arg("init").arg(path.to_string_lossy())
}

/// A hint for stderr that looks like an authentication failure.
pub fn auth_hint(stderr: &str) -> Option<&'static str> {
    if stderr.contains("Authentication failed")
        || stderr.contains("Permission denied")
        || stderr.contains("Could not read from remote repository")
    {
        Some("check that your SSH key is loaded or your git credentials are configured")
    } else {
        None
    }
}
