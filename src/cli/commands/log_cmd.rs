//! log command - Show walked commit history
//!
//! Lists the commits the repository model walked, newest first unless the
//! walk is configured to run in reverse.

use crate::cli::Context;
use crate::ui::output;
use crate::ui::render;
use anyhow::Result;

/// Show walked commits.
///
/// # Arguments
///
/// * `ctx` - Execution context
/// * `max_count` - Show at most this many commits
pub fn log(ctx: &Context, max_count: Option<usize>) -> Result<()> {
    let (repo, config) = ctx.open_repo()?;
    let limit = max_count.unwrap_or(usize::MAX);
    let commits = &repo.commits()[..repo.commits().len().min(limit)];

    if ctx.json {
        output::print_json(commits)?;
        return Ok(());
    }

    if commits.is_empty() {
        output::print("No commits yet.", ctx.verbosity);
        return Ok(());
    }

    let palette = ctx.palette(&config);
    let now = chrono::Utc::now();
    output::print_lines(
        commits
            .iter()
            .map(|commit| render::commit_line(commit, now, &palette)),
        ctx.verbosity,
    );

    Ok(())
}
