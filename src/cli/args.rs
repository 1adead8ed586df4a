//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Errors only
//! - `--color <when>`: Override the configured color choice
//! - `--json`: Machine-readable output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::ColorChoice;

/// gitscope - Branches, commits and diffs of a Git repository
#[derive(Parser, Debug)]
#[command(name = "gscope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if gscope was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// When to color output (overrides config)
    #[arg(long, global = true, value_enum, value_name = "WHEN")]
    pub color: Option<ColorWhen>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show walked commit history
    #[command(
        name = "log",
        long_about = "Show the commit history of the current branch.\n\n\
            When the current branch tracks an upstream, history is walked from the \
            upstream tip and each commit is tagged: `even` if both tips reach it, \
            `remote` if only the upstream does. Without an upstream, history is \
            walked from HEAD and commits are untagged.",
        after_help = "\
EXAMPLES:
    # Recent history
    gscope log -n 20

    # Everything, as JSON
    gscope log --json"
    )]
    Log {
        /// Show at most this many commits
        #[arg(short = 'n', long = "max-count", value_name = "N")]
        max_count: Option<usize>,
    },

    /// List branches with upstream state
    #[command(
        name = "branches",
        long_about = "List branches and how far each has diverged from its upstream.\n\n\
            The current branch is marked with an asterisk (*). Branches that match \
            their upstream exactly show `=`; others show ahead and behind counts.",
        after_help = "\
EXAMPLES:
    # Local branches
    gscope branches

    # Include remote-tracking branches
    gscope branches --all"
    )]
    Branches {
        /// Include remote-tracking branches
        #[arg(short, long)]
        all: bool,
    },

    /// Show the changes a commit introduced
    #[command(
        name = "show",
        long_about = "Show the changes a commit introduced relative to its first parent.\n\n\
            Root commits are compared against an empty tree. The hash may be \
            abbreviated to as few as four characters if it is unambiguous.",
        after_help = "\
EXAMPLES:
    # Full patch
    gscope show 3f2a9c1

    # Stats only
    gscope show 3f2a9c1 --stat"
    )]
    Show {
        /// Commit hash (full or abbreviated)
        hash: String,

        /// Show only the stats block and file list
        #[arg(long)]
        stat: bool,
    },

    /// List configured remotes
    Remotes,

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell. Add the output \
            to your shell's configuration to enable tab-completion for gscope commands.",
        after_help = "\
EXAMPLES:
    # Bash (add to ~/.bashrc)
    gscope completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    gscope completion zsh >> ~/.zshrc

    # Fish
    gscope completion fish > ~/.config/fish/completions/gscope.fish

    # PowerShell
    gscope completion powershell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// `--color` values
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

impl From<ColorWhen> for ColorChoice {
    fn from(when: ColorWhen) -> Self {
        match when {
            ColorWhen::Auto => ColorChoice::Auto,
            ColorWhen::Always => ColorChoice::Always,
            ColorWhen::Never => ColorChoice::Never,
        }
    }
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
