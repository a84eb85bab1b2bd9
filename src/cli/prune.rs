//! Prune command - delete branches fully merged into the trunk

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check};
use anstream::println;
use sd::error::Result;
use sd::prune::execute_prune;

/// Handle `sd prune`.
pub fn run_prune(ctx: &mut CommandContext) -> Result<()> {
    println!(
        "Checking for branches merged into '{}'...",
        ctx.graph.trunk.accent()
    );

    let report = execute_prune(&mut ctx.graph, &ctx.vcs)?;

    if report.is_empty() {
        println!("{} Nothing to prune.", check());
        return Ok(());
    }

    if !report.deleted.is_empty() {
        ctx.save_graph()?;
        for branch in &report.deleted {
            println!("  deleted '{}'", branch.accent());
        }
    }
    if let Some(current) = &report.skipped_current {
        println!(
            "  {}",
            format!("skipped '{current}' (currently checked out)").muted()
        );
    }
    for (branch, reason) in &report.failed {
        println!(
            "  {}",
            format!("failed to delete '{branch}': {reason}").warn()
        );
    }

    println!("{} Prune complete.", check());
    Ok(())
}
