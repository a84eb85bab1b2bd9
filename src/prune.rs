//! Prune Engine - remove branches fully merged into the trunk
//!
//! Split like the merge engine elsewhere in this crate: a pure planning step
//! (which merged branches, in what order) and an effectful execution step
//! (delete the branch, then untrack it). Per-branch deletion failures are
//! collected, not fatal: other independent branches still get processed.

use crate::error::Result;
use crate::git::Vcs;
use crate::graph::Graph;
use std::collections::BTreeSet;

/// Outcome of a prune pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Branches deleted and untracked
    pub deleted: Vec<String>,
    /// Branches whose deletion failed, with the collaborator's message;
    /// these stay tracked so a later pass can retry
    pub failed: Vec<(String, String)>,
    /// Merged branch skipped because it is the current checkout
    pub skipped_current: Option<String>,
}

impl PruneReport {
    /// True when nothing was deleted, skipped, or failed.
    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty() && self.failed.is_empty() && self.skipped_current.is_none()
    }
}

/// Order the merged, tracked branches for removal (PURE).
///
/// Leaves come before their ancestors: a branch is always evaluated before
/// its would-be-merged parent has been removed and its children re-parented.
/// Ties keep graph insertion order, so the result is deterministic.
pub fn plan_prune(graph: &Graph, merged: &BTreeSet<String>) -> Vec<String> {
    let mut candidates: Vec<(usize, String)> = graph
        .branches
        .iter()
        .filter(|n| merged.contains(&n.name))
        .map(|n| {
            let depth = graph.depth(&n.name).unwrap_or(0);
            (depth, n.name.clone())
        })
        .collect();
    // Deepest first; sort is stable, so siblings keep insertion order.
    candidates.sort_by(|a, b| b.0.cmp(&a.0));
    candidates.into_iter().map(|(_, name)| name).collect()
}

/// Delete merged branches and untrack them (EFFECTFUL).
///
/// Deletion happens before untracking: when git refuses (its own merged
/// check is stricter than ours), the branch stays tracked and the failure
/// lands in the report. The current checkout is never deleted.
pub fn execute_prune(graph: &mut Graph, vcs: &dyn Vcs) -> Result<PruneReport> {
    let merged = vcs.merged_branches(&graph.trunk)?;
    let current = vcs.current_branch()?;
    let mut report = PruneReport::default();

    for branch in plan_prune(graph, &merged) {
        if branch == current {
            report.skipped_current = Some(branch);
            continue;
        }
        match vcs.delete_branch(&branch) {
            Ok(()) => {
                graph.remove(&branch)?;
                report.deleted.push(branch);
            }
            Err(e) => {
                tracing::debug!(branch = %branch, "branch deletion refused");
                report.failed.push((branch, e.to_string()));
            }
        }
    }

    Ok(report)
}
