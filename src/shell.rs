//! Running user command templates through the shell
//!
//! Templates are opaque to the engine: they are handed to `sh -c` with the
//! per-branch `SD_*` variables (and any alias env) injected, so `$SD_CURRENT_BRANCH`
//! style references are expanded by the shell itself, not by us.

use crate::error::Result;
use std::collections::BTreeMap;
use std::process::Command;

/// Run a shell command template with the given extra environment.
///
/// Returns `Ok(true)` on exit code 0, `Ok(false)` on any non-zero exit, and
/// an error only when the shell itself could not be spawned. Stdout/stderr
/// are inherited: the user's command owns the terminal while it runs (an
/// editor opened by a rebase must work).
pub fn run(template: &str, env: &BTreeMap<String, String>) -> Result<bool> {
    let prompt = env
        .get("SD_CURRENT_BRANCH")
        .map_or("shell", String::as_str);
    println!("[{prompt}]> {template}");

    let status = Command::new("sh")
        .arg("-c")
        .arg(template)
        .envs(env)
        .status()?;

    if !status.success() {
        tracing::debug!(template, code = ?status.code(), "shell command failed");
    }
    Ok(status.success())
}
