//! Shared test fixtures: an in-memory VCS collaborator and graph builders.

use sd::error::{Error, Result};
use sd::git::Vcs;
use sd::graph::Graph;
use std::cell::RefCell;
use std::collections::BTreeSet;

/// In-memory [`Vcs`] recording every interaction.
#[derive(Debug, Default)]
pub struct MockVcs {
    current: RefCell<String>,
    /// Branches checked out, in order.
    pub checkouts: RefCell<Vec<String>>,
    /// Branches reported as merged into the trunk.
    pub merged: BTreeSet<String>,
    /// Branches whose deletion the mock refuses.
    pub undeletable: BTreeSet<String>,
    /// Branches deleted, in order.
    pub deleted: RefCell<Vec<String>>,
}

impl MockVcs {
    pub fn new(current: &str) -> Self {
        Self {
            current: RefCell::new(current.to_string()),
            ..Self::default()
        }
    }

    pub fn with_merged(current: &str, merged: &[&str]) -> Self {
        let mut mock = Self::new(current);
        mock.merged = merged.iter().map(ToString::to_string).collect();
        mock
    }

    pub fn current(&self) -> String {
        self.current.borrow().clone()
    }
}

impl Vcs for MockVcs {
    fn current_branch(&self) -> Result<String> {
        Ok(self.current.borrow().clone())
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.checkouts.borrow_mut().push(branch.to_string());
        *self.current.borrow_mut() = branch.to_string();
        Ok(())
    }

    fn create_branch(&self, name: &str, _base: &str) -> Result<()> {
        *self.current.borrow_mut() = name.to_string();
        Ok(())
    }

    fn merged_branches(&self, _trunk: &str) -> Result<BTreeSet<String>> {
        Ok(self.merged.clone())
    }

    fn delete_branch(&self, name: &str) -> Result<()> {
        if self.undeletable.contains(name) {
            return Err(Error::Git {
                command: "branch".to_string(),
                message: format!("the branch '{name}' is not fully merged"),
            });
        }
        self.deleted.borrow_mut().push(name.to_string());
        Ok(())
    }
}

/// Linear stack `main <- a <- b <- c`.
pub fn linear_stack(names: &[&str]) -> Graph {
    let mut graph = Graph::default();
    let mut parent: Option<String> = None;
    for name in names {
        graph.add(name, parent.as_deref()).unwrap();
        parent = Some((*name).to_string());
    }
    graph
}
