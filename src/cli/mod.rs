//! cli
//!
//! Command-line interface layer for gitscope.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and the repository model
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Handlers read from [`crate::repo::Repository`] and
//! render through [`crate::ui`]; nothing here writes to the repository.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::core::config::{ColorChoice, Config};
use crate::git::Git;
use crate::repo::{RepoOptions, Repository};
use crate::ui::output::Verbosity;
use crate::ui::render::Palette;

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    pub verbosity: Verbosity,
    /// `--color`, if given. Takes precedence over config.
    pub color: Option<ColorChoice>,
    /// Emit JSON instead of text.
    pub json: bool,
}

impl Context {
    /// Directory to discover the repository from.
    pub fn cwd(&self) -> Result<PathBuf> {
        match &self.cwd {
            Some(path) => Ok(path.clone()),
            None => std::env::current_dir().context("Failed to read current directory"),
        }
    }

    /// Open the repository and its configuration.
    pub fn open_repo(&self) -> Result<(Repository, Config)> {
        let cwd = self.cwd()?;
        let git = Git::open(&cwd).context("Failed to open repository")?;
        let config = Config::load(Some(git.git_dir())).context("Failed to load configuration")?;
        let repo = Repository::load(git, &RepoOptions::from_config(&config))
            .context("Failed to load repository")?;
        Ok((repo, config))
    }

    /// Palette for text output.
    ///
    /// JSON output is never colored.
    pub fn palette(&self, config: &Config) -> Palette {
        if self.json {
            return Palette::plain();
        }
        let enabled = match self.color.unwrap_or_else(|| config.color()) {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
            }
        };
        Palette::new(enabled)
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run(cli: Cli) -> Result<()> {
    let ctx = Context {
        cwd: cli.cwd.clone(),
        verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
        color: cli.color.map(ColorChoice::from),
        json: cli.json,
    };

    commands::dispatch(cli.command, &ctx)
}
