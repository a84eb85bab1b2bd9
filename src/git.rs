//! External version-control collaborator
//!
//! The engine never interprets repository state itself; everything it needs
//! from git goes through the [`Vcs`] trait so tests can substitute an
//! in-memory fake. [`GitCli`] is the real implementation, shelling out to
//! the `git` binary (overridable via `SD_GIT_EXECUTABLE`).

use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Environment variable naming an alternate git binary
pub const GIT_EXECUTABLE_VAR: &str = "SD_GIT_EXECUTABLE";

/// Version-control operations consumed by the engine and the prune pass
pub trait Vcs {
    /// Name of the currently checked-out branch
    fn current_branch(&self) -> Result<String>;

    /// Check out an existing branch
    fn checkout(&self, branch: &str) -> Result<()>;

    /// Create a new branch based on `base` and check it out
    fn create_branch(&self, name: &str, base: &str) -> Result<()>;

    /// All local branches fully merged into `trunk`
    fn merged_branches(&self, trunk: &str) -> Result<BTreeSet<String>>;

    /// Delete a local branch, refusing when git considers it unmerged
    fn delete_branch(&self, name: &str) -> Result<()>;
}

/// [`Vcs`] implementation that spawns the `git` binary
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::from_env()
    }
}

impl GitCli {
    /// Build a `GitCli`, honoring `SD_GIT_EXECUTABLE`
    pub fn from_env() -> Self {
        let program = std::env::var(GIT_EXECUTABLE_VAR).unwrap_or_else(|_| "git".to_string());
        Self { program }
    }

    /// Run a git subcommand, returning trimmed stdout
    fn run(&self, args: &[&str]) -> Result<String> {
        tracing::debug!(git = %self.program, ?args, "spawning git");
        let output = Command::new(&self.program).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Git {
                    command: args.first().copied().unwrap_or_default().to_string(),
                    message: format!("executable '{}' not found (check {GIT_EXECUTABLE_VAR})", self.program),
                }
            } else {
                Error::Io(e)
            }
        })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(Error::Git {
                command: args.first().copied().unwrap_or_default().to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    /// Root of the working tree
    pub fn repo_root(&self) -> Result<PathBuf> {
        self.run(&["rev-parse", "--show-toplevel"])
            .map(PathBuf::from)
            .map_err(|_| Error::NotARepository)
    }

    /// The repository's `.git` directory (absolute)
    pub fn git_dir(&self) -> Result<PathBuf> {
        let dir = self.run(&["rev-parse", "--absolute-git-dir"]).map_err(|_| Error::NotARepository)?;
        Ok(PathBuf::from(dir))
    }
}

impl Vcs for GitCli {
    fn current_branch(&self) -> Result<String> {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", branch]).map(|_| ())
    }

    fn create_branch(&self, name: &str, base: &str) -> Result<()> {
        self.run(&["checkout", "-b", name, base]).map(|_| ())
    }

    fn merged_branches(&self, trunk: &str) -> Result<BTreeSet<String>> {
        let out = self.run(&["branch", "--merged", trunk, "--format=%(refname:short)"])?;
        Ok(out.lines().map(|l| l.trim().to_string()).filter(|l| !l.is_empty()).collect())
    }

    fn delete_branch(&self, name: &str) -> Result<()> {
        self.run(&["branch", "-d", name]).map(|_| ())
    }
}

/// Refuse to start a new run while git itself is mid-operation
///
/// A rebase, merge, cherry-pick, or revert in progress means the working
/// tree is not in a state a traversal can safely mutate. Continue/abort
/// flows skip this check: they exist precisely to finish such a state.
pub fn ensure_clean_state(git_dir: &Path) -> Result<()> {
    const BUSY_MARKERS: &[(&str, &str)] = &[
        ("rebase-merge", "rebase"),
        ("rebase-apply", "rebase"),
        ("MERGE_HEAD", "merge"),
        ("CHERRY_PICK_HEAD", "cherry-pick"),
        ("REVERT_HEAD", "revert"),
    ];
    for (marker, what) in BUSY_MARKERS {
        if git_dir.join(marker).exists() {
            return Err(Error::RepoBusy(what));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clean_state_on_empty_git_dir() {
        let temp = TempDir::new().unwrap();
        assert!(ensure_clean_state(temp.path()).is_ok());
    }

    #[test]
    fn test_rebase_marker_blocks() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("rebase-merge")).unwrap();
        let err = ensure_clean_state(temp.path()).unwrap_err();
        assert!(matches!(err, Error::RepoBusy("rebase")));
    }

    #[test]
    fn test_merge_marker_blocks() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("MERGE_HEAD"), "abc").unwrap();
        let err = ensure_clean_state(temp.path()).unwrap_err();
        assert!(matches!(err, Error::RepoBusy("merge")));
    }
}
