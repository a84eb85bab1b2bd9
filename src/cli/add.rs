//! Add command - create a branch stacked on the current checkout

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check};
use anstream::println;
use sd::error::{Error, Result};
use sd::git::Vcs;

/// Handle `sd add <branch>`.
///
/// The new branch is based on the current checkout and tracked as its child
/// (a stack root when the checkout is the trunk). An untracked, non-trunk
/// checkout is adopted as a new stack root first, so stacking on a branch
/// created outside sd just works.
pub fn run_add(ctx: &mut CommandContext, branch: &str) -> Result<()> {
    let parent = ctx.vcs.current_branch()?;

    if ctx.graph.contains(branch) || ctx.graph.is_trunk(branch) {
        return Err(Error::DuplicateBranch(branch.to_string()));
    }

    if !ctx.graph.is_trunk(&parent) && !ctx.graph.contains(&parent) {
        println!(
            "Adopting untracked branch '{}' as a new stack root.",
            parent.accent()
        );
        ctx.graph.add(&parent, None)?;
    }

    println!(
        "Creating branch '{}' based on '{}'...",
        branch.accent(),
        parent.accent()
    );
    ctx.vcs.create_branch(branch, &parent)?;

    let graph_parent = (!ctx.graph.is_trunk(&parent)).then_some(parent.as_str());
    ctx.graph.add(branch, graph_parent)?;
    ctx.save_graph()?;

    println!(
        "{} Stacked '{}' on top of '{}'.",
        check(),
        branch.accent(),
        parent.accent()
    );
    Ok(())
}
