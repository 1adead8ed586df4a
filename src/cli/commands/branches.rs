//! branches command - List branches with upstream state
//!
//! Shows local branches (and with `--all`, remote-tracking branches), each
//! with its tip and, when tracked, how far it has diverged from upstream.

use crate::cli::Context;
use crate::repo::Branch;
use crate::ui::output;
use crate::ui::render;
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct BranchView<'a> {
    #[serde(flatten)]
    branch: &'a Branch,
    current: bool,
}

/// List branches.
///
/// # Arguments
///
/// * `ctx` - Execution context
/// * `all` - Include remote-tracking branches
pub fn branches(ctx: &Context, all: bool) -> Result<()> {
    let (repo, config) = ctx.open_repo()?;
    let current = repo.current_branch();

    let shown: Vec<&Branch> = repo
        .branches()
        .iter()
        .filter(|b| all || !b.is_remote())
        .collect();

    if ctx.json {
        let views: Vec<BranchView<'_>> = shown
            .iter()
            .map(|&branch| BranchView {
                branch,
                current: current == Some(branch),
            })
            .collect();
        output::print_json(&views)?;
        return Ok(());
    }

    if shown.is_empty() {
        output::print("No branches found.", ctx.verbosity);
        return Ok(());
    }

    let palette = ctx.palette(&config);
    for branch in shown {
        let is_current = current == Some(branch);
        output::print(render::branch_line(branch, is_current, &palette), ctx.verbosity);
    }

    Ok(())
}
