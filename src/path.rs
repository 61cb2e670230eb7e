//! Path resolution for configured repositories

use std::path::{Path, PathBuf};

use crate::config::Repository;

/// Resolve the working directory of `repository` under `root_folder`.
///
/// This is a plain platform join with no I/O. A malformed folder name yields
/// a malformed path; the process that later runs there reports the failure.
pub fn resolve(repository: &Repository, root_folder: &Path) -> PathBuf {
    root_folder.join(&repository.folder_name)
}
