//! Logical path handling.
//!
//! A logical path is the caller-supplied directory-like string a file lives
//! under. It is stored and looked up with separators stripped from both ends
//! and repeated separators collapsed, so `/docs/2024/`, `docs//2024` and
//! `docs/2024` all name the same location.

use crate::error::{Error, Result};

/// Separator between logical path components.
pub const SEPARATOR: char = '/';

/// Strip separator characters from both ends of a logical path and collapse
/// repeated separators, so every spelling of a location yields one key.
pub fn normalize_path(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    for part in raw.split(SEPARATOR).filter(|part| !part.is_empty()) {
        if !normalized.is_empty() {
            normalized.push(SEPARATOR);
        }
        normalized.push_str(part);
    }
    normalized
}

/// Reject logical paths that could step outside the directory they name.
///
/// Expects a normalized path: empty components (`a//b`) are rejected, the
/// empty path (the base directory itself) is accepted.
pub fn validate_path(path: &str) -> Result<()> {
    if path.contains('\0') || path.contains('\\') {
        return Err(Error::InvalidPath(format!(
            "contains a forbidden character: {path:?}"
        )));
    }
    if path.is_empty() {
        return Ok(());
    }
    for part in path.split(SEPARATOR) {
        if part.is_empty() {
            return Err(Error::InvalidPath(format!(
                "path is not normalized: {path:?}"
            )));
        }
        if part == "." || part == ".." {
            return Err(Error::InvalidPath(format!(
                "relative components are not allowed: {path:?}"
            )));
        }
    }
    Ok(())
}

/// Reject names that are not a single plain path component.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(Error::InvalidName(format!("not a file name: {name:?}")));
    }
    if name.contains(SEPARATOR) || name.contains('\\') || name.contains('\0') {
        return Err(Error::InvalidName(format!(
            "contains a forbidden character: {name:?}"
        )));
    }
    Ok(())
}
