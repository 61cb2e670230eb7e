//! Default values for repo-watch configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::PathBuf;
use std::time::Duration;

/// Environment variable that overrides the config path.
pub const CONFIG_ENV: &str = "REPO_WATCH_CONFIG";

/// Environment variable that overrides the process timeout.
pub const TIMEOUT_ENV: &str = "REPO_WATCH_TIMEOUT";

/// Seconds a non-interactive external process may run before it is killed.
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Written by `repo-watch init`.
pub const EXAMPLE_CONFIG: &str = r#"# repo-watch configuration
rootFolder: ~/code
editCommand: code
# Kill git commands that run longer than this. 0 disables the limit.
timeoutSeconds: 600
repositories:
  - nickname: repo1
    folderName: repo1
    url: https://github.com/user/repo1.git
  - nickname: repo2
    folderName: repo2
    url: https://github.com/user/repo2.git
    sparse: true
"#;

/// Returns the default configuration file path.
///
/// Uses the platform-appropriate config directory:
/// - Linux: `~/.config/repo-watch/config.yaml` (XDG Base Directory)
/// - macOS: `~/Library/Application Support/repo-watch/config.yaml`
/// - Windows: `{FOLDERID_RoamingAppData}\repo-watch\config.yaml`
///
/// Falls back to `repo-watch.yaml` in the current directory if the platform
/// config directory cannot be determined.
///
/// Overridden by `--config` or `REPO_WATCH_CONFIG`.
pub fn default_config_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("repo-watch").join("config.yaml"),
        None => PathBuf::from("repo-watch.yaml"),
    }
}

/// Resolve the effective timeout.
///
/// The flag (or env var) wins over the config file; both fall back to
/// [`DEFAULT_TIMEOUT_SECS`]. Zero disables the timeout.
pub fn effective_timeout(flag: Option<u64>, config: Option<u64>) -> Option<Duration> {
    match flag.or(config).unwrap_or(DEFAULT_TIMEOUT_SECS) {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    }
}
