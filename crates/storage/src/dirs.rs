//! Directory primitives for the mirrored blob tree.
//!
//! Directories have no catalog representation; they are created on write and
//! pruned on delete, derived entirely from the logical path. Every primitive
//! here is safe to call redundantly.

use fileshelf_core::normalize_path;
use fileshelf_core::path::SEPARATOR;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Result of [`remove_if_empty`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The directory was empty and has been removed.
    Removed,
    /// The directory holds at least one entry and was left in place.
    NotEmpty,
    /// Nothing exists at the given path.
    Missing,
}

/// Whether `path` exists and is a directory.
pub async fn is_directory(path: &Path) -> io::Result<bool> {
    match fs::metadata(path).await {
        Ok(meta) => Ok(meta.is_dir()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Create `dir` and any missing ancestors. An existing directory is not an error.
pub async fn ensure_directory_exists(dir: &Path) -> io::Result<()> {
    if is_directory(dir).await? {
        return Ok(());
    }
    fs::create_dir_all(dir).await
}

/// Whether `dir` has zero entries.
pub async fn is_empty_directory(dir: &Path) -> io::Result<bool> {
    let mut entries = fs::read_dir(dir).await?;
    Ok(entries.next_entry().await?.is_none())
}

/// Remove `dir` only if it is empty.
pub async fn remove_if_empty(dir: &Path) -> io::Result<RemoveOutcome> {
    match is_empty_directory(dir).await {
        Ok(true) => {}
        Ok(false) => return Ok(RemoveOutcome::NotEmpty),
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(RemoveOutcome::Missing),
        Err(e) => return Err(e),
    }

    match fs::remove_dir(dir).await {
        Ok(()) => Ok(RemoveOutcome::Removed),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(RemoveOutcome::Missing),
        // A writer added an entry between the check and the removal.
        Err(e) if e.kind() == ErrorKind::DirectoryNotEmpty => Ok(RemoveOutcome::NotEmpty),
        Err(e) => Err(e),
    }
}

/// Directories between `root` (exclusive) and `root/path` (inclusive), deepest first.
pub fn ancestors_below(root: &Path, logical_path: &str) -> Vec<PathBuf> {
    let normalized = normalize_path(logical_path);
    let parts: Vec<&str> = normalized
        .split(SEPARATOR)
        .filter(|part| !part.is_empty())
        .collect();

    (1..=parts.len())
        .rev()
        .map(|depth| {
            let mut dir = root.to_path_buf();
            dir.extend(&parts[..depth]);
            dir
        })
        .collect()
}

/// Walk from `root/path` toward `root`, removing each empty directory.
///
/// Stops at the first directory that still has entries. Missing levels are
/// skipped so the walk can be repeated. `root` itself is never removed.
pub async fn prune_empty_ancestors(root: &Path, logical_path: &str) -> io::Result<usize> {
    let mut removed = 0;
    for dir in ancestors_below(root, logical_path) {
        match remove_if_empty(&dir).await? {
            RemoveOutcome::Removed => removed += 1,
            RemoveOutcome::Missing => continue,
            RemoveOutcome::NotEmpty => break,
        }
    }
    Ok(removed)
}
