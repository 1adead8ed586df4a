//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Opens the repository through the shared [`Context`]
//! 2. Reads the loaded model
//! 3. Renders text, or JSON with `--json`
//!
//! Handlers never write to the repository.

mod branches;
mod completion;
mod log_cmd;
mod remotes;
mod show;

// Re-export command functions for testing and direct invocation
pub use branches::branches;
pub use completion::completion;
pub use log_cmd::log;
pub use remotes::remotes;
pub use show::show;

use crate::cli::args::Command;
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Log { max_count } => log(ctx, max_count),
        Command::Branches { all } => branches(ctx, all),
        Command::Show { hash, stat } => show(ctx, &hash, stat),
        Command::Remotes => remotes(ctx),
        Command::Completion { shell } => completion(shell),
    }
}
