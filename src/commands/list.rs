//! # List Command Implementation
//!
//! Prints every configured repository with its remote, resolved path and
//! whether that path exists yet. Read-only.

use anyhow::Result;
use repo_watch::path;

use super::GlobalOpts;

/// Execute the `list` command.
pub fn execute(global: &GlobalOpts) -> Result<()> {
    let registry = global.load_registry()?;
    let root = registry.root();
    let sink = global.sink();

    if registry.repositories.is_empty() {
        sink.add_line("No repositories configured");
    }

    for repo in &registry.repositories {
        let dir = path::resolve(repo, &root);
        let state = if dir.exists() { "cloned" } else { "not cloned" };
        let sparse = if repo.sparse { ", sparse" } else { "" };
        sink.add_line(&format!(
            "{}: {} -> {} ({}{})",
            repo.nickname,
            repo.url,
            dir.display(),
            state,
            sparse
        ));
    }

    sink.output()?;
    Ok(())
}
