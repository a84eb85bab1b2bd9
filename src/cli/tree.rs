//! Tree command - render the tracked forest

use crate::cli::context::CommandContext;
use crate::cli::style::Stylize;
use anstream::println;
use sd::graph::Graph;

/// Handle `sd tree`.
pub fn run_tree(ctx: &CommandContext) {
    let trunk = &ctx.graph.trunk;
    let roots = ctx.graph.children(trunk);

    if roots.is_empty() {
        println!(
            "No stacks to display. Your trunk branch is '{}'.",
            trunk.accent()
        );
        return;
    }

    println!("{} {}", trunk.accent(), "(trunk)".muted());
    let count = roots.len();
    for (i, root) in roots.iter().enumerate() {
        print_subtree(&ctx.graph, root, "", i == count - 1);
    }
}

fn print_subtree(graph: &Graph, branch: &str, prefix: &str, is_last: bool) {
    let connector = if is_last { "└── " } else { "├── " };
    println!("{prefix}{connector}{branch}");

    let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
    let children = graph.children(branch);
    let count = children.len();
    for (i, child) in children.iter().enumerate() {
        print_subtree(graph, child, &child_prefix, i == count - 1);
    }
}
