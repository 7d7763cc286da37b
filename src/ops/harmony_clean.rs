//! Remove the unified build directory.

use std::path::PathBuf;

use anyhow::Result;

use crate::core::Workspace;
use crate::util::fs::remove_dir_all_if_exists;

/// Result of `harmony clean`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanResult {
    pub path: PathBuf,
    /// False when there was nothing to remove
    pub removed: bool,
}

/// Remove the workspace build directory tree.
///
/// A missing directory is not an error; a failed removal is.
pub fn clean(ws: &Workspace) -> Result<CleanResult> {
    let path = ws.build_dir();
    let removed = remove_dir_all_if_exists(&path)?;
    if removed {
        tracing::debug!("removed {}", path.display());
    }
    Ok(CleanResult { path, removed })
}
