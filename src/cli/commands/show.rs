//! show command - Show the changes a commit introduced

use crate::cli::Context;
use crate::git::Diff;
use crate::repo::Commit;
use crate::ui::output;
use crate::ui::render;
use anyhow::{Context as _, Result};
use serde::Serialize;

#[derive(Serialize)]
struct ShowView<'a> {
    commit: &'a Commit,
    diff: &'a Diff,
}

/// Show a commit's header, stats, and (unless `stat_only`) its patches.
pub fn show(ctx: &Context, hash: &str, stat_only: bool) -> Result<()> {
    let (repo, config) = ctx.open_repo()?;

    let handle = repo
        .commit_ref(hash)
        .with_context(|| format!("Failed to resolve commit '{}'", hash))?;
    let commit = repo.commit(&handle).context("Failed to read commit")?;
    let diff = repo.diff(&handle).context("Failed to diff commit")?;

    if ctx.json {
        output::print_json(&ShowView {
            commit: &commit,
            diff: &diff,
        })?;
        return Ok(());
    }

    let palette = ctx.palette(&config);
    output::print_lines(render::commit_header(&commit, &palette), ctx.verbosity);
    output::print("", ctx.verbosity);
    output::print_lines(diff.stats(), ctx.verbosity);

    if stat_only {
        for delta in diff.deltas() {
            output::print(render::delta_line(delta, &palette), ctx.verbosity);
        }
        return Ok(());
    }

    for delta in diff.deltas() {
        output::print("", ctx.verbosity);
        output::print(render::delta_line(delta, &palette), ctx.verbosity);
        output::print_lines(render::patch_lines(&delta.patch, &palette), ctx.verbosity);
    }

    Ok(())
}
