//! Shared test utilities for the CLI end-to-end tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_repos(&[("api", "api", "u", false)]);
//!     fixture.command().arg("list").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::git_available;
    pub use super::TestFixture;
}

/// Whether a `git` executable is on PATH. Tests that drive real git skip
/// themselves when it is not.
#[allow(dead_code)]
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Run git with a throwaway identity, panicking on failure.
#[allow(dead_code)]
fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args([
            "-c",
            "user.name=repo-watch tests",
            "-c",
            "user.email=tests@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .current_dir(dir)
        .status()
        .expect("failed to run git");
    assert!(status.success(), "git {:?} failed", args);
}

/// A temporary directory holding `config.yaml` and a `code/` root folder.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
    repos: Vec<(String, String, String, bool)>,
    edit_command: String,
}

impl TestFixture {
    /// Create a fixture with an empty repository list.
    pub fn new() -> Self {
        let fixture = Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
            repos: Vec::new(),
            edit_command: "true".to_string(),
        };
        fixture.write_config();
        fixture
    }

    /// Register repositories as `(nickname, folder, url, sparse)`.
    pub fn with_repos(mut self, repos: &[(&str, &str, &str, bool)]) -> Self {
        self.repos = repos
            .iter()
            .map(|(n, f, u, s)| (n.to_string(), f.to_string(), u.to_string(), *s))
            .collect();
        self.write_config();
        self
    }

    #[allow(dead_code)]
    pub fn with_edit_command(mut self, command: &str) -> Self {
        self.edit_command = command.to_string();
        self.write_config();
        self
    }

    fn write_config(&self) {
        let mut yaml = format!(
            "rootFolder: {}\neditCommand: {}\nrepositories:",
            self.root().display(),
            self.edit_command
        );
        if self.repos.is_empty() {
            yaml.push_str(" []\n");
        } else {
            yaml.push('\n');
            for (nickname, folder, url, sparse) in &self.repos {
                yaml.push_str(&format!(
                    "  - nickname: {}\n    folderName: {}\n    url: {}\n    sparse: {}\n",
                    nickname, folder, url, sparse
                ));
            }
        }
        self.temp_dir
            .child("config.yaml")
            .write_str(&yaml)
            .expect("Failed to write config file");
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The configured root folder.
    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join("code")
    }

    /// Get the path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join("config.yaml")
    }

    /// Create a folder under the root, as if the repository were cloned.
    #[allow(dead_code)]
    pub fn with_folder(self, folder: &str) -> Self {
        std::fs::create_dir_all(self.root().join(folder)).expect("Failed to create folder");
        self
    }

    /// Create a local origin repository with one commit and return its path,
    /// usable as a clone URL.
    #[allow(dead_code)]
    pub fn make_origin(&self, name: &str) -> PathBuf {
        let dir = self.temp_dir.path().join("origins").join(name);
        std::fs::create_dir_all(&dir).expect("Failed to create origin folder");
        git(&dir, &["init", "--quiet"]);
        std::fs::write(dir.join("README.md"), "hello\n").expect("Failed to write README");
        git(&dir, &["add", "README.md"]);
        git(&dir, &["commit", "--quiet", "-m", "initial"]);
        dir
    }

    /// A command for the binary, pointed at this fixture's config, with
    /// colours off.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("repo-watch");
        cmd.current_dir(self.path())
            .env_remove("REPO_WATCH_CONFIG")
            .env_remove("REPO_WATCH_TIMEOUT")
            .env_remove("RUST_LOG")
            .arg("--color")
            .arg("never")
            .arg("--config")
            .arg(self.config_path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
