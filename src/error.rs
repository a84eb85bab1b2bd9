//! Error types for sd

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// All errors surfaced by sd
///
/// Per-node failures of the user's command are deliberately *not* represented
/// here: they become durable pause state and a distinguished
/// [`Outcome::Paused`](crate::engine::Outcome) so the caller can report
/// "resolve, then continue or abort" instead of a generic crash.
#[derive(Debug, Error)]
pub enum Error {
    /// The durable graph file could not be parsed
    #[error("corrupt metadata file {path}: {reason}")]
    CorruptGraph {
        /// Path of the offending file
        path: String,
        /// Parse failure detail
        reason: String,
    },

    /// Branch is already tracked in the graph
    #[error("branch '{0}' is already tracked")]
    DuplicateBranch(String),

    /// Requested parent is neither the trunk nor a tracked branch
    #[error("parent '{0}' is neither the trunk nor a tracked branch")]
    UnknownParent(String),

    /// Branch is not tracked in the graph
    #[error("branch '{0}' is not tracked")]
    UnknownBranch(String),

    /// The current checkout is neither the trunk nor a tracked branch
    #[error("current branch '{0}' is not tracked; nothing to traverse")]
    DetachedHead(String),

    /// The traversal produced no branches to visit
    #[error("no branches to process")]
    EmptyStack,

    /// A paused operation already exists
    #[error("a previous '{0}' operation was interrupted; use --continue or --abort")]
    OperationInProgress(String),

    /// Continue/abort requested but no pause state exists
    #[error("no operation found to resume or abort")]
    NothingToResume,

    /// Alias name did not resolve
    #[error("alias '{0}' not found")]
    AliasNotFound(String),

    /// Alias definition failed validation
    #[error("invalid alias '{name}': {reason}")]
    AliasInvalid {
        /// Alias name
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// User alias would redefine a built-in without explicit consent
    #[error("alias '{0}' shadows a built-in; pass --force to redefine it")]
    AliasShadowsBuiltin(String),

    /// Malformed KEY=VALUE environment override
    #[error("invalid environment override '{0}': {1}")]
    InvalidEnvVar(String, String),

    /// Environment overrides only apply to new runs
    #[error("environment overrides cannot be combined with --continue or --abort")]
    EnvDuringResume,

    /// Invocation shape errors not expressible in the argument parser
    #[error("{0}")]
    Usage(String),

    /// Pre-flight command exited non-zero before any branch was touched
    #[error("pre-flight command failed; nothing was changed")]
    PreFlightFailed,

    /// A git plumbing command failed
    #[error("git {command} failed: {message}")]
    Git {
        /// The git subcommand that failed
        command: String,
        /// Captured stderr (trimmed)
        message: String,
    },

    /// Not inside a git working tree
    #[error("not inside a git repository")]
    NotARepository,

    /// Git itself has an unfinished operation (rebase, merge, ...)
    #[error("git has an unfinished {0} in progress; complete or abort it first")]
    RepoBusy(&'static str),

    /// Durable state could not be read or written
    #[error("{0}")]
    Storage(String),

    /// Underlying I/O failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
