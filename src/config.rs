//! # Configuration Schema and Parsing
//!
//! This module defines the data structures that represent the repo-watch
//! configuration file and the logic for loading and persisting it.
//!
//! ## Key Components
//!
//! - **`Repository`**: one named checkout (nickname, folder, remote URL and
//!   whether it is cloned sparsely). Immutable for the duration of a batch.
//!
//! - **`Registry`**: the ordered list of repositories plus process-wide
//!   settings (`rootFolder`, `editCommand`, `timeoutSeconds`).
//!
//! ## Format
//!
//! ```yaml
//! rootFolder: ~/code
//! editCommand: code
//! repositories:
//!   - nickname: api
//!     folderName: api-server
//!     url: git@github.com:example/api-server.git
//!     sparse: true
//! ```
//!
//! Nicknames are expected to be unique. Loading tolerates duplicates (the
//! first entry wins on lookup and a warning is logged); [`Registry::add`]
//! refuses to create new ones.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single configured checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    /// Unique key used to select this repository on the command line.
    pub nickname: String,
    /// Directory name under the registry's root folder.
    pub folder_name: String,
    /// Remote URL passed to `git clone`.
    pub url: String,
    /// Clone with `--sparse`.
    #[serde(default)]
    pub sparse: bool,
}

impl Repository {
    pub fn new(
        nickname: impl Into<String>,
        folder_name: impl Into<String>,
        url: impl Into<String>,
        sparse: bool,
    ) -> Self {
        Self {
            nickname: nickname.into(),
            folder_name: folder_name.into(),
            url: url.into(),
            sparse,
        }
    }
}

/// The full configuration: settings plus the ordered repository list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registry {
    /// Folder every repository's `folderName` is resolved against.
    ///
    /// A leading `~` is expanded by [`Registry::root`]; the stored value is
    /// kept as written so that saving does not rewrite it.
    pub root_folder: PathBuf,
    /// Editor command used by `edit`, e.g. `code` or `nvim`.
    #[serde(default)]
    pub edit_command: String,
    /// Timeout for non-interactive external processes, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub repositories: Vec<Repository>,
}

impl Registry {
    /// The root folder with a leading `~` expanded to the home directory.
    pub fn root(&self) -> PathBuf {
        expand_home(&self.root_folder)
    }

    /// Look up a repository by nickname. The first match wins.
    pub fn find(&self, nickname: &str) -> Option<&Repository> {
        self.repositories.iter().find(|r| r.nickname == nickname)
    }

    /// Nicknames that appear more than once, in first-seen order.
    pub fn duplicate_nicknames(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();
        for repo in &self.repositories {
            let name = repo.nickname.as_str();
            if !seen.insert(name) && reported.insert(name) {
                duplicates.push(name);
            }
        }
        duplicates
    }

    /// Append a repository, rejecting a nickname that is already taken.
    pub fn add(&mut self, repository: Repository) -> Result<()> {
        if self.find(&repository.nickname).is_some() {
            return Err(Error::DuplicateNickname {
                nickname: repository.nickname,
            });
        }
        self.repositories.push(repository);
        Ok(())
    }

    /// Write the registry as YAML, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }
}

/// Parse a registry from YAML text.
pub fn parse(yaml_content: &str) -> Result<Registry> {
    serde_yaml::from_str(yaml_content).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: Some("Run 'repo-watch init --print' to see an example configuration".to_string()),
    })
}

/// Load a registry from a file.
///
/// Duplicate nicknames are tolerated and logged; lookups resolve to the first
/// entry.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Registry> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::ConfigNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path)?;
    let registry = parse(&content)?;

    for nickname in registry.duplicate_nicknames() {
        warn!(
            "Nickname '{}' appears more than once in {}; using the first entry",
            nickname,
            path.display()
        );
    }

    Ok(registry)
}

fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}
