//! sd - stacked git branches with resumable sub-tree command runs
//!
//! The library is organized around small, separately testable pieces:
//!
//! - [`graph`] - the persisted forest of tracked branches (Graph Store)
//! - [`alias`] - built-in and user-defined named workflows (Alias Registry)
//! - [`engine`] - traversal planning plus the resumable execution engine
//! - [`prune`] - removal of branches fully merged into the trunk
//! - [`git`] - the external version-control collaborator behind a trait
//! - [`shell`] - running user command templates with an injected environment
//!
//! Every invocation is a short-lived process: durable state (the graph file
//! and, while an operation is paused, the pause file) is loaded at start,
//! mutated in memory, and written back atomically before exit.

pub mod alias;
pub mod engine;
pub mod error;
pub mod git;
pub mod graph;
pub mod prune;
pub mod shell;
