//! # Add and Create Command Implementations
//!
//! `add` appends a repository to the configuration file. Any field not given
//! as a flag is asked for interactively with `dialoguer`, so
//!
//! ```bash
//! repo-watch add --nickname api --folder api-server --url git@host:api.git --sparse
//! ```
//!
//! runs without prompting. Nicknames must be unique.
//!
//! `create` does the same, then creates the folder and runs `git init` in it.

use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use repo_watch::actions;
use repo_watch::config::{Registry, Repository};
use repo_watch::error::Error;
use repo_watch::suggestions;

use super::GlobalOpts;

/// Add a repository to the configuration file
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Unique nickname for the repository
    #[arg(long, value_name = "NAME")]
    pub nickname: Option<String>,

    /// Folder name under rootFolder (defaults to the nickname when prompting)
    #[arg(long, value_name = "DIR")]
    pub folder: Option<String>,

    /// Remote URL
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Clone with sparse checkout
    #[arg(long)]
    pub sparse: bool,

    /// Do not prompt; missing fields are an error
    #[arg(short, long)]
    pub yes: bool,
}

/// Build the repository from flags, prompting for anything missing.
fn repository_from(args: AddArgs) -> Result<Repository> {
    let theme = ColorfulTheme::default();
    let interactive = !args.yes;

    let nickname = match args.nickname {
        Some(n) => n,
        None if interactive => Input::with_theme(&theme)
            .with_prompt("Nickname")
            .interact_text()?,
        None => anyhow::bail!("--nickname is required with --yes"),
    };

    let folder = match args.folder {
        Some(f) => f,
        None if interactive => Input::with_theme(&theme)
            .with_prompt("Folder name")
            .default(nickname.clone())
            .interact_text()?,
        None => nickname.clone(),
    };

    let url = match args.url {
        Some(u) => u,
        None if interactive => Input::with_theme(&theme)
            .with_prompt("URL")
            .interact_text()?,
        None => anyhow::bail!("--url is required with --yes"),
    };

    let sparse = if args.sparse || !interactive {
        args.sparse
    } else {
        Confirm::with_theme(&theme)
            .with_prompt("Enable sparse checkout?")
            .default(false)
            .interact()?
    };

    Ok(Repository::new(nickname, folder, url, sparse))
}

/// Append `repository` to the registry on disk.
fn append(global: &GlobalOpts, repository: Repository) -> Result<Registry> {
    let mut registry = global.load_registry()?;
    match registry.add(repository) {
        Ok(()) => {}
        Err(Error::DuplicateNickname { nickname }) => {
            return Err(suggestions::duplicate_nickname(&nickname))
        }
        Err(e) => return Err(e.into()),
    }
    registry.save(&global.config_path)?;
    Ok(registry)
}

/// Execute the `add` command.
pub fn execute(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    // Fail on a missing config before prompting for anything.
    global.load_registry()?;

    let repository = repository_from(args)?;
    let nickname = repository.nickname.clone();
    append(global, repository)?;

    let sink = global.sink();
    sink.add_line(&format!("Repository added: {}", nickname));
    sink.output()?;
    Ok(())
}

/// Execute the `create` command.
pub fn execute_create(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    global.load_registry()?;

    let repository = repository_from(args)?;
    let registry = append(global, repository.clone())?;

    let sink = global.sink();
    sink.add_line(&format!("Repository added: {}", repository.nickname));
    let ctx = global.context(&registry);
    sink.add_outcome(&actions::init(&ctx, &repository));
    sink.output()?;
    Ok(())
}
