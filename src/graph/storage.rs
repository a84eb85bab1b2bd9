//! Persistence for the branch graph in `<git-dir>/sd/`.

use super::Graph;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name for sd metadata within the git dir.
const SD_DIR: &str = "sd";

/// Filename for the branch graph.
const GRAPH_FILE: &str = "graph.json";

/// Current on-disk format version.
const GRAPH_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct GraphFile {
    version: u32,
    #[serde(flatten)]
    graph: Graph,
}

/// Get path to the sd metadata directory.
pub fn sd_dir(git_dir: &Path) -> PathBuf {
    git_dir.join(SD_DIR)
}

/// Get path to the graph file.
pub fn graph_path(git_dir: &Path) -> PathBuf {
    sd_dir(git_dir).join(GRAPH_FILE)
}

/// Load the graph from disk.
///
/// An absent file yields an empty default graph; an unparseable file is a
/// [`Error::CorruptGraph`].
pub fn load_graph(git_dir: &Path) -> Result<Graph> {
    let path = graph_path(git_dir);

    if !path.exists() {
        return Ok(Graph::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| Error::Storage(format!("failed to read {}: {e}", path.display())))?;

    let file: GraphFile = serde_json::from_str(&content).map_err(|e| Error::CorruptGraph {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    if file.version > GRAPH_VERSION {
        return Err(Error::CorruptGraph {
            path: path.display().to_string(),
            reason: format!("unsupported version {}", file.version),
        });
    }

    // A hand-edited file can encode a dangling parent or a parent cycle;
    // either would send the traversal helpers into an endless walk.
    if let Some(reason) = file.graph.invariant_violation() {
        return Err(Error::CorruptGraph {
            path: path.display().to_string(),
            reason,
        });
    }

    Ok(file.graph)
}

/// Save the graph to disk, creating `<git-dir>/sd/` if needed.
pub fn save_graph(git_dir: &Path, graph: &Graph) -> Result<()> {
    let path = graph_path(git_dir);
    let file = GraphFile {
        version: GRAPH_VERSION,
        graph: graph.clone(),
    };
    let content = serde_json::to_string_pretty(&file)
        .map_err(|e| Error::Storage(format!("failed to serialize graph: {e}")))?;
    write_atomic(&path, &content)
}

/// Write a durable file atomically: temp file in the same directory, then
/// rename over the target. A crash mid-write leaves the previous state
/// intact, never a half-written file.
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = path.parent().ok_or_else(|| {
        Error::Storage(format!("no parent directory for {}", path.display()))
    })?;
    if !dir.exists() {
        fs::create_dir_all(dir)
            .map_err(|e| Error::Storage(format!("failed to create {}: {e}", dir.display())))?;
    }

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| Error::Storage(format!("failed to create temp file in {}: {e}", dir.display())))?;
    std::io::Write::write_all(&mut tmp, content.as_bytes())
        .map_err(|e| Error::Storage(format!("failed to write {}: {e}", path.display())))?;
    tmp.persist(path)
        .map_err(|e| Error::Storage(format!("failed to persist {}: {e}", path.display())))?;

    tracing::debug!(path = %path.display(), "wrote state file");
    Ok(())
}
