//! remotes command - List configured remotes

use crate::cli::Context;
use crate::ui::output;
use crate::ui::render;
use anyhow::Result;

/// List remotes with their URLs.
pub fn remotes(ctx: &Context) -> Result<()> {
    let (repo, config) = ctx.open_repo()?;

    if ctx.json {
        output::print_json(repo.remotes())?;
        return Ok(());
    }

    let palette = ctx.palette(&config);
    for remote in repo.remotes() {
        output::print_lines(render::remote_lines(remote, &palette), ctx.verbosity);
    }

    Ok(())
}
