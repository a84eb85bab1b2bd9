//! Shared command context for CLI commands
//!
//! Extracts the common setup every subcommand needs: locating the
//! repository, loading the graph, and loading the alias registry. There is
//! no resident state - each invocation builds a fresh context from disk and
//! persists any mutation before exiting.

use sd::alias::Registry;
use sd::engine::Engine;
use sd::error::Result;
use sd::git::GitCli;
use sd::graph::{Graph, load_graph, save_graph};
use std::path::PathBuf;

/// Shared context for CLI commands
pub struct CommandContext {
    /// The git collaborator
    pub vcs: GitCli,
    /// Root of the working tree (where the project alias file lives)
    pub repo_root: PathBuf,
    /// The repository's git dir (where sd metadata lives)
    pub git_dir: PathBuf,
    /// The tracked branch forest, loaded at startup
    pub graph: Graph,
    /// Merged built-in and user alias view
    pub registry: Registry,
}

impl CommandContext {
    /// Build a context for the current working directory.
    pub fn new() -> Result<Self> {
        let vcs = GitCli::from_env();
        let repo_root = vcs.repo_root()?;
        let git_dir = vcs.git_dir()?;
        let graph = load_graph(&git_dir)?;
        let registry = Registry::load(&repo_root)?;

        Ok(Self {
            vcs,
            repo_root,
            git_dir,
            graph,
            registry,
        })
    }

    /// Persist the (possibly mutated) graph.
    pub fn save_graph(&self) -> Result<()> {
        save_graph(&self.git_dir, &self.graph)
    }

    /// An execution engine over this context's collaborators.
    pub fn engine(&self) -> Engine<'_> {
        Engine::new(&self.vcs, &self.git_dir)
    }
}
