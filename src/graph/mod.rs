//! Graph Store - the persisted forest of tracked branches
//!
//! Each tracked branch records at most one parent; `parent: None` means the
//! branch roots a stack directly on the trunk. Nodes are kept in a `Vec` in
//! the order they were added, which is the child-ordering guarantee the
//! traversal planner relies on - siblings are never re-sorted.

mod storage;

pub use storage::{graph_path, load_graph, save_graph, sd_dir};
pub(crate) use storage::write_atomic;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default trunk branch name for a fresh graph
pub const DEFAULT_TRUNK: &str = "main";

/// A tracked branch and its recorded parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchNode {
    /// Branch name (unique within the graph)
    pub name: String,
    /// Parent branch, or `None` for a stack rooted on the trunk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// The forest of tracked branches, anchored at the trunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    /// The designated integration branch; never itself a tracked node
    pub trunk: String,
    /// Tracked branches in the order they were added
    #[serde(default)]
    pub branches: Vec<BranchNode>,
}

impl Default for Graph {
    fn default() -> Self {
        Self {
            trunk: DEFAULT_TRUNK.to_string(),
            branches: Vec::new(),
        }
    }
}

impl Graph {
    /// Create an empty graph with the given trunk
    pub fn new(trunk: impl Into<String>) -> Self {
        Self {
            trunk: trunk.into(),
            branches: Vec::new(),
        }
    }

    /// Whether `name` is the trunk branch
    pub fn is_trunk(&self, name: &str) -> bool {
        self.trunk == name
    }

    /// Whether `name` is a tracked branch
    pub fn contains(&self, name: &str) -> bool {
        self.branches.iter().any(|n| n.name == name)
    }

    fn node(&self, name: &str) -> Option<&BranchNode> {
        self.branches.iter().find(|n| n.name == name)
    }

    /// Parent of a tracked branch; `None` when it roots a stack on the trunk
    pub fn parent_of(&self, name: &str) -> Result<Option<&str>> {
        self.node(name)
            .map(|n| n.parent.as_deref())
            .ok_or_else(|| Error::UnknownBranch(name.to_string()))
    }

    /// Track a new branch under `parent` (the trunk when `None`)
    ///
    /// The parent must already exist, so the parent relation always forms a
    /// forest: a fresh node has no children and cannot close a cycle.
    pub fn add(&mut self, name: &str, parent: Option<&str>) -> Result<()> {
        if self.contains(name) || self.is_trunk(name) {
            return Err(Error::DuplicateBranch(name.to_string()));
        }
        // Normalize: an explicit trunk parent is stored as a stack root.
        let parent = match parent {
            Some(p) if self.is_trunk(p) => None,
            Some(p) => {
                if !self.contains(p) {
                    return Err(Error::UnknownParent(p.to_string()));
                }
                Some(p.to_string())
            }
            None => None,
        };
        self.branches.push(BranchNode {
            name: name.to_string(),
            parent,
        });
        Ok(())
    }

    /// Untrack a branch, re-parenting its children to its former parent
    ///
    /// Children keep their relative order, so removing a middle branch from a
    /// stack splices the stack rather than orphaning its tail.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let idx = self
            .branches
            .iter()
            .position(|n| n.name == name)
            .ok_or_else(|| Error::UnknownBranch(name.to_string()))?;
        let removed = self.branches.remove(idx);
        for node in &mut self.branches {
            if node.parent.as_deref() == Some(name) {
                node.parent.clone_from(&removed.parent);
            }
        }
        Ok(())
    }

    /// Move a tracked branch under a new parent (the trunk when `None`)
    pub fn reparent(&mut self, name: &str, new_parent: Option<&str>) -> Result<()> {
        if !self.contains(name) {
            return Err(Error::UnknownBranch(name.to_string()));
        }
        let parent = match new_parent {
            Some(p) if self.is_trunk(p) => None,
            Some(p) => {
                if !self.contains(p) {
                    return Err(Error::UnknownParent(p.to_string()));
                }
                // Re-parenting under a descendant (or itself) would close a cycle.
                if p == name || self.descendants(name).iter().any(|d| *d == p) {
                    return Err(Error::UnknownParent(p.to_string()));
                }
                Some(p.to_string())
            }
            None => None,
        };
        if let Some(node) = self.branches.iter_mut().find(|n| n.name == name) {
            node.parent = parent;
        }
        Ok(())
    }

    /// Direct children of `name`, in the order they were added
    ///
    /// Passing the trunk yields the roots of all stacks.
    pub fn children(&self, name: &str) -> Vec<&str> {
        self.branches
            .iter()
            .filter(|n| {
                if self.is_trunk(name) {
                    n.parent.is_none()
                } else {
                    n.parent.as_deref() == Some(name)
                }
            })
            .map(|n| n.name.as_str())
            .collect()
    }

    /// Chain of ancestors from `name` up to (excluding) the trunk
    pub fn ancestors(&self, name: &str) -> Result<Vec<&str>> {
        let mut out = Vec::new();
        let mut cursor = self.parent_of(name)?;
        while let Some(parent) = cursor {
            out.push(parent);
            cursor = self.parent_of(parent)?;
        }
        Ok(out)
    }

    /// All branches below `name` in pre-order, each subtree in full before
    /// the next sibling
    pub fn descendants(&self, name: &str) -> Vec<&str> {
        let mut out = Vec::new();
        let mut stack: Vec<&str> = self.children(name);
        stack.reverse();
        while let Some(branch) = stack.pop() {
            out.push(branch);
            let mut kids = self.children(branch);
            kids.reverse();
            stack.extend(kids);
        }
        out
    }

    /// Root of the stack containing `name`: the ancestor parented by the trunk
    pub fn stack_root<'a>(&'a self, name: &'a str) -> Result<&'a str> {
        Ok(self.ancestors(name)?.last().copied().unwrap_or(name))
    }

    /// Distance from the trunk (a stack root has depth 1)
    pub fn depth(&self, name: &str) -> Result<usize> {
        Ok(self.ancestors(name)?.len() + 1)
    }

    /// Check the forest invariant, returning a description of the first
    /// violation: a parent that is not tracked, or a parent chain that never
    /// reaches the trunk.
    ///
    /// The mutation methods uphold the invariant themselves; this exists for
    /// graphs deserialized from a file that may have been hand-edited.
    pub(crate) fn invariant_violation(&self) -> Option<String> {
        for node in &self.branches {
            let mut cursor = node.parent.as_deref();
            let mut hops = 0;
            while let Some(parent) = cursor {
                if !self.contains(parent) {
                    return Some(format!(
                        "branch '{}' references unknown parent '{parent}'",
                        node.name
                    ));
                }
                hops += 1;
                if hops > self.branches.len() {
                    return Some(format!("parent cycle involving branch '{}'", node.name));
                }
                cursor = self.node(parent).and_then(|n| n.parent.as_deref());
            }
        }
        None
    }
}
