//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! gitscope has two configuration scopes:
//! - **Global**: User-level settings
//! - **Repo**: Repository-level overrides
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$GITSCOPE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/gitscope/config.toml`
//! 3. `~/.gitscope/config.toml`
//!
//! # Repo Config Location
//!
//! `<git dir>/gitscope/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use gitscope::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("/path/to/repo/.git"))).unwrap();
//! println!("stats width: {}", config.stats_width());
//! println!("walk order: {:?}", config.walk_order());
//! ```

pub mod schema;

pub use schema::{ColorChoice, ConfigFile, DiffSection, DisplaySection, WalkOrder, WalkSection};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence automatically: repo config overrides global
/// config, which overrides the built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: ConfigFile,
    /// Repository configuration (if one was found)
    pub repo: Option<ConfigFile>,
    global_path: Option<PathBuf>,
    repo_path: Option<PathBuf>,
}

impl Config {
    /// Default unified diff context.
    pub const DEFAULT_CONTEXT_LINES: u32 = 3;

    /// Default stats block width.
    pub const DEFAULT_STATS_WIDTH: usize = 80;

    /// Load configuration from the default locations.
    ///
    /// If `git_dir` is provided, also loads the repository config stored
    /// inside it.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed
    /// or validated. Missing files are not an error.
    pub fn load(git_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let global = Self::global_config_location();
        Self::load_from(global.as_deref(), git_dir)
    }

    /// Load configuration from an explicit global file and git directory.
    ///
    /// Either may be absent; a global path that does not exist on disk is
    /// treated the same as no global config.
    pub fn load_from(
        global_path: Option<&Path>,
        git_dir: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let (global, global_path) = match global_path {
            Some(path) if path.exists() => (Self::read_config(path)?, Some(path.to_path_buf())),
            _ => (ConfigFile::default(), None),
        };

        let (repo, repo_path) = match git_dir.map(Self::repo_config_path) {
            Some(path) if path.exists() => (Some(Self::read_config(&path)?), Some(path)),
            _ => (None, None),
        };

        Ok(Config {
            global,
            repo,
            global_path,
            repo_path,
        })
    }

    /// Find the global config file, if any exists.
    fn global_config_location() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("GITSCOPE_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("gitscope/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        dirs::home_dir()
            .map(|home| home.join(".gitscope/config.toml"))
            .filter(|path| path.exists())
    }

    /// Read, parse and validate one config file.
    fn read_config(path: &Path) -> Result<ConfigFile, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the canonical path for repo config inside a git directory.
    pub fn repo_config_path(git_dir: &Path) -> PathBuf {
        git_dir.join("gitscope/config.toml")
    }

    /// Resolve a value, repo scope first.
    fn pick<T>(&self, get: impl Fn(&ConfigFile) -> Option<T>) -> Option<T> {
        self.repo.as_ref().and_then(&get).or_else(|| get(&self.global))
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Walk order. Defaults to topological + time.
    pub fn walk_order(&self) -> WalkOrder {
        self.pick(|c| c.walk.as_ref().and_then(|w| w.order))
            .unwrap_or_default()
    }

    /// Whether the walk yields oldest first. Defaults to `false`.
    pub fn walk_reverse(&self) -> bool {
        self.pick(|c| c.walk.as_ref().and_then(|w| w.reverse))
            .unwrap_or(false)
    }

    /// Unified diff context lines. Defaults to 3.
    pub fn context_lines(&self) -> u32 {
        self.pick(|c| c.diff.as_ref().and_then(|d| d.context_lines))
            .unwrap_or(Self::DEFAULT_CONTEXT_LINES)
    }

    /// Stats block width. Defaults to 80.
    pub fn stats_width(&self) -> usize {
        self.pick(|c| c.diff.as_ref().and_then(|d| d.stats_width))
            .unwrap_or(Self::DEFAULT_STATS_WIDTH)
    }

    /// Rename detection. Defaults to `false`.
    pub fn detect_renames(&self) -> bool {
        self.pick(|c| c.diff.as_ref().and_then(|d| d.detect_renames))
            .unwrap_or(false)
    }

    /// Color choice. Defaults to `auto`.
    pub fn color(&self) -> ColorChoice {
        self.pick(|c| c.display.as_ref().and_then(|d| d.color))
            .unwrap_or_default()
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded repo config file.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}
