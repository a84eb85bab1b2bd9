//! Traversal planning - pure functions, no I/O
//!
//! Turns (graph, current position, mode) into the ordered list of branches a
//! run will visit. Pre-order depth-first: a branch always appears after its
//! parent, each child subtree completes before the next sibling begins, and
//! siblings keep the order they were added to the graph. That ordering is
//! what makes "rebase each branch onto its already-updated parent" safe.

use crate::error::{Error, Result};
use crate::graph::Graph;
use serde::{Deserialize, Serialize};

/// Which branches a run visits, and from where
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalMode {
    /// Exclude the starting branch, visiting only what is below it
    pub descendants_only: bool,
    /// Start from the root of the current stack rather than the checkout
    pub start_from_root: bool,
}

/// One planned visit: the branch and its recorded parent (the trunk for roots)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Branch to check out and run on
    pub branch: String,
    /// Parent exposed to the command as `SD_PARENT_BRANCH`
    pub parent: String,
}

/// Compute the ordered visitation sequence for a run.
///
/// The current checkout must be the trunk or a tracked branch
/// ([`Error::DetachedHead`] otherwise). The trunk itself is never visited:
/// starting there traverses every stack. An empty sequence (e.g.
/// `descendants_only` on a leaf) is [`Error::EmptyStack`].
pub fn plan(graph: &Graph, current: &str, mode: TraversalMode) -> Result<Vec<PlanStep>> {
    if !graph.contains(current) && !graph.is_trunk(current) {
        return Err(Error::DetachedHead(current.to_string()));
    }

    let start = if mode.start_from_root && !graph.is_trunk(current) {
        graph.stack_root(current)?
    } else {
        current
    };

    let mut steps = Vec::new();
    if graph.is_trunk(start) {
        // Trunk is not a tracked node; traverse every stack below it.
        for root in graph.children(start) {
            push_subtree(graph, root, &graph.trunk, &mut steps);
        }
    } else if mode.descendants_only {
        for child in graph.children(start) {
            push_subtree(graph, child, start, &mut steps);
        }
    } else {
        let parent = graph.parent_of(start)?.unwrap_or(&graph.trunk);
        push_subtree(graph, start, parent, &mut steps);
    }

    if steps.is_empty() {
        return Err(Error::EmptyStack);
    }
    Ok(steps)
}

fn push_subtree(graph: &Graph, branch: &str, parent: &str, steps: &mut Vec<PlanStep>) {
    steps.push(PlanStep {
        branch: branch.to_string(),
        parent: parent.to_string(),
    });
    for child in graph.children(branch) {
        push_subtree(graph, child, branch, steps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_graph() -> Graph {
        // main <- a <- b <- c
        let mut g = Graph::default();
        g.add("a", None).unwrap();
        g.add("b", Some("a")).unwrap();
        g.add("c", Some("b")).unwrap();
        g
    }

    fn branches(steps: &[PlanStep]) -> Vec<&str> {
        steps.iter().map(|s| s.branch.as_str()).collect()
    }

    #[test]
    fn test_start_from_root_visits_whole_stack() {
        let g = linear_graph();
        let steps = plan(
            &g,
            "c",
            TraversalMode {
                start_from_root: true,
                ..TraversalMode::default()
            },
        )
        .unwrap();
        assert_eq!(branches(&steps), vec!["a", "b", "c"]);
        assert_eq!(steps[0].parent, "main");
        assert_eq!(steps[2].parent, "b");
    }

    #[test]
    fn test_descendants_only_excludes_start() {
        let g = linear_graph();
        let steps = plan(
            &g,
            "a",
            TraversalMode {
                descendants_only: true,
                ..TraversalMode::default()
            },
        )
        .unwrap();
        assert_eq!(branches(&steps), vec!["b", "c"]);
        assert_eq!(steps[0].parent, "a");
    }

    #[test]
    fn test_default_mode_includes_start() {
        let g = linear_graph();
        let steps = plan(&g, "b", TraversalMode::default()).unwrap();
        assert_eq!(branches(&steps), vec!["b", "c"]);
    }

    #[test]
    fn test_untracked_current_is_detached() {
        let g = linear_graph();
        let err = plan(&g, "elsewhere", TraversalMode::default()).unwrap_err();
        assert!(matches!(err, Error::DetachedHead(b) if b == "elsewhere"));
    }

    #[test]
    fn test_descendants_only_on_leaf_is_empty() {
        let g = linear_graph();
        let err = plan(
            &g,
            "c",
            TraversalMode {
                descendants_only: true,
                ..TraversalMode::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::EmptyStack));
    }

    #[test]
    fn test_trunk_traverses_all_stacks_without_itself() {
        let mut g = linear_graph();
        g.add("x", None).unwrap();
        let steps = plan(&g, "main", TraversalMode::default()).unwrap();
        assert_eq!(branches(&steps), vec!["a", "b", "c", "x"]);
    }

    #[test]
    fn test_subtree_completes_before_sibling() {
        // a has children b and b2; b has child c.
        let mut g = Graph::default();
        g.add("a", None).unwrap();
        g.add("b", Some("a")).unwrap();
        g.add("b2", Some("a")).unwrap();
        g.add("c", Some("b")).unwrap();

        let steps = plan(&g, "a", TraversalMode::default()).unwrap();
        assert_eq!(branches(&steps), vec!["a", "b", "c", "b2"]);
    }

    #[test]
    fn test_plan_is_deterministic_and_duplicate_free() {
        let mut g = linear_graph();
        g.add("b2", Some("a")).unwrap();
        let mode = TraversalMode {
            start_from_root: true,
            ..TraversalMode::default()
        };

        let first = plan(&g, "c", mode).unwrap();
        let second = plan(&g, "c", mode).unwrap();
        assert_eq!(first, second);

        let mut seen = std::collections::BTreeSet::new();
        for step in &first {
            assert!(seen.insert(step.branch.clone()), "duplicate {}", step.branch);
            // A parent is either the trunk or already visited.
            assert!(step.parent == "main" || seen.contains(&step.parent));
        }
    }
}
