//! Persistence for user aliases in the project alias file.
//!
//! Unlike the graph and pause files, this lives at the repository root so
//! users can edit and commit it.

use super::AliasSpec;
use crate::error::{Error, Result};
use crate::graph::write_atomic;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Filename for user-defined aliases at the repository root.
const ALIAS_FILE: &str = ".sd_aliases.json";

/// Get path to the project alias file.
pub fn alias_path(repo_root: &Path) -> PathBuf {
    repo_root.join(ALIAS_FILE)
}

/// Load user aliases. An absent file means only built-ins are available.
pub fn load_user_aliases(repo_root: &Path) -> Result<BTreeMap<String, AliasSpec>> {
    let path = alias_path(repo_root);

    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| Error::Storage(format!("failed to read {}: {e}", path.display())))?;

    serde_json::from_str(&content).map_err(|e| {
        Error::Storage(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Save user aliases to the project alias file.
pub fn save_user_aliases(repo_root: &Path, aliases: &BTreeMap<String, AliasSpec>) -> Result<()> {
    let path = alias_path(repo_root);
    let content = serde_json::to_string_pretty(aliases)
        .map_err(|e| Error::Storage(format!("failed to serialize aliases: {e}")))?;
    write_atomic(&path, &content)
}
