//! Durable pause state for interrupted runs
//!
//! Created when a per-branch command fails, consumed by continue/abort in a
//! later process. Absence of the file is the canonical "nothing to resume"
//! signal, so deletion must be unconditional on abort.

use super::plan::PlanStep;
use crate::error::{Error, Result};
use crate::graph::{sd_dir, write_atomic};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Filename for pause state, beside the graph file.
const PAUSE_FILE: &str = "pause.json";

/// Everything a later invocation needs to resume or abort a paused run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseState {
    /// Operation name for messages ("run" or the alias name)
    pub operation: String,
    /// Branch checked out when the run began
    pub start_branch: String,
    /// The per-branch command template
    pub run_template: String,
    /// Branches not yet completed; the failing branch is at the front so it
    /// is retried first
    pub remaining: Vec<PlanStep>,
    /// Default remediation for `--continue`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continue_cmd: Option<String>,
    /// Default remediation for `--abort`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abort_cmd: Option<String>,
    /// Deferred post-flight command, run only on full completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_flight: Option<String>,
    /// Resolved environment for this run (defaults plus overrides)
    #[serde(default)]
    pub env: std::collections::BTreeMap<String, String>,
}

/// Get path to the pause state file.
pub fn pause_path(git_dir: &Path) -> PathBuf {
    sd_dir(git_dir).join(PAUSE_FILE)
}

/// Load pause state; `None` means no operation is paused.
pub fn load_pause(git_dir: &Path) -> Result<Option<PauseState>> {
    let path = pause_path(git_dir);

    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| Error::Storage(format!("failed to read {}: {e}", path.display())))?;
    let state = serde_json::from_str(&content)
        .map_err(|e| Error::Storage(format!("failed to parse {}: {e}", path.display())))?;
    Ok(Some(state))
}

/// Persist pause state atomically.
pub fn save_pause(git_dir: &Path, state: &PauseState) -> Result<()> {
    let content = serde_json::to_string_pretty(state)
        .map_err(|e| Error::Storage(format!("failed to serialize pause state: {e}")))?;
    write_atomic(&pause_path(git_dir), &content)
}

/// Delete pause state. Idempotent: a missing file is fine.
pub fn clear_pause(git_dir: &Path) -> Result<()> {
    match fs::remove_file(pause_path(git_dir)) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Storage(format!("failed to delete pause state: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn sample() -> PauseState {
        PauseState {
            operation: "update".to_string(),
            start_branch: "feat-c".to_string(),
            run_template: "git rebase $SD_PARENT_BRANCH".to_string(),
            remaining: vec![
                PlanStep {
                    branch: "feat-b".to_string(),
                    parent: "feat-a".to_string(),
                },
                PlanStep {
                    branch: "feat-c".to_string(),
                    parent: "feat-b".to_string(),
                },
            ],
            continue_cmd: Some("git rebase --continue".to_string()),
            abort_cmd: Some("git rebase --abort".to_string()),
            post_flight: None,
            env: BTreeMap::from([("REMOTE".to_string(), "origin".to_string())]),
        }
    }

    #[test]
    fn test_absent_file_means_nothing_to_resume() {
        let temp = TempDir::new().unwrap();
        assert!(load_pause(temp.path()).unwrap().is_none());
    }

    #[test]
    fn test_roundtrip() {
        let temp = TempDir::new().unwrap();
        let state = sample();
        save_pause(temp.path(), &state).unwrap();
        assert_eq!(load_pause(temp.path()).unwrap(), Some(state));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let temp = TempDir::new().unwrap();
        clear_pause(temp.path()).unwrap();

        save_pause(temp.path(), &sample()).unwrap();
        clear_pause(temp.path()).unwrap();
        assert!(load_pause(temp.path()).unwrap().is_none());
        clear_pause(temp.path()).unwrap();
    }
}
