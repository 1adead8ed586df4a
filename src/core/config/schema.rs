//! core::config::schema
//!
//! Configuration schema types.
//!
//! The same schema is used for both scopes (global and repository); the
//! repository file overrides the global one section by section, key by key.
//!
//! # Validation
//!
//! Config values are validated after parsing so that out-of-range numbers
//! are reported with the file that contained them.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// One configuration file (either scope).
///
/// # Example
///
/// ```toml
/// [walk]
/// order = "topological-time"
/// reverse = false
///
/// [diff]
/// context_lines = 3
/// stats_width = 80
/// detect_renames = false
///
/// [display]
/// color = "auto"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// History walk settings
    pub walk: Option<WalkSection>,

    /// Diff engine settings
    pub diff: Option<DiffSection>,

    /// Terminal display settings
    pub display: Option<DisplaySection>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(diff) = &self.diff {
            diff.validate()?;
        }
        Ok(())
    }
}

/// `[walk]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WalkSection {
    /// Traversal order of the commit walk
    pub order: Option<WalkOrder>,

    /// Emit oldest commits first
    pub reverse: Option<bool>,
}

/// `[diff]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DiffSection {
    /// Unified diff context lines
    pub context_lines: Option<u32>,

    /// Width used when rendering the stats block
    pub stats_width: Option<usize>,

    /// Run rename/copy detection on the tree diff
    pub detect_renames: Option<bool>,
}

impl DiffSection {
    /// Largest accepted context size.
    pub const MAX_CONTEXT_LINES: u32 = 1000;

    /// Narrowest stats block libgit2 can render sensibly.
    pub const MIN_STATS_WIDTH: usize = 10;

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(lines) = self.context_lines {
            if lines > Self::MAX_CONTEXT_LINES {
                return Err(ConfigError::InvalidValue(format!(
                    "diff.context_lines must be at most {}, got {}",
                    Self::MAX_CONTEXT_LINES,
                    lines
                )));
            }
        }
        if let Some(width) = self.stats_width {
            if width < Self::MIN_STATS_WIDTH {
                return Err(ConfigError::InvalidValue(format!(
                    "diff.stats_width must be at least {}, got {}",
                    Self::MIN_STATS_WIDTH,
                    width
                )));
            }
        }
        Ok(())
    }
}

/// `[display]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySection {
    /// When to emit ANSI colors
    pub color: Option<ColorChoice>,
}

/// Traversal order of the commit walk.
///
/// The order is always pinned explicitly; libgit2's implicit default is
/// never relied upon.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum WalkOrder {
    /// Parents after all their children, ties broken by commit time
    #[default]
    TopologicalTime,
    /// Parents after all their children
    Topological,
    /// Commit time, newest first
    Time,
    /// Whatever order the store yields
    None,
}

/// When to emit ANSI colors.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ColorChoice {
    /// Color when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            other => Err(ConfigError::InvalidValue(format!(
                "invalid color choice '{}', must be one of: auto, always, never",
                other
            ))),
        }
    }
}
