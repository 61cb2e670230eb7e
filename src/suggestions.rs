//! # Error Suggestions
//!
//! Helpers for errors that tell the user what went wrong AND how to fix it.
//!
//! ```rust,ignore
//! // Instead of:
//! anyhow::bail!("Configuration file not found: {}", path.display());
//!
//! // Use:
//! return Err(suggestions::config_not_found(path));
//! ```

use std::path::Path;

/// The configuration file does not exist.
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Run 'repo-watch init' to create one\n\
         hint: Use --config to specify a different path\n\
         hint: Set the REPO_WATCH_CONFIG environment variable",
        path = path.display()
    )
}

/// A batch command was given neither a nickname nor `--all`.
pub fn missing_selector(command: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Please specify a repository nickname or use --all\n\n\
         hint: repo-watch {command} <nickname>\n\
         hint: repo-watch {command} --all\n\
         hint: Run 'repo-watch list' to see configured nicknames"
    )
}

/// `add` was asked to register a nickname that already exists.
pub fn duplicate_nickname(nickname: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Repository nickname already exists in config: {nickname}\n\n\
         hint: Choose a different nickname\n\
         hint: Run 'repo-watch list' to see configured nicknames"
    )
}

/// `init` would overwrite an existing config.
pub fn config_exists(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file already exists: {path}\n\n\
         hint: Use --force to overwrite it\n\
         hint: Use --print to write the example to stdout instead",
        path = path.display()
    )
}
