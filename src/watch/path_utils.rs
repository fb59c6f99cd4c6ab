// src/watch/path_utils.rs

//! Utility functions for path handling in the watcher.

use std::path::{Path, PathBuf};

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Tries a direct `strip_prefix(root)` first, then retries with both paths
/// canonicalized (macOS reports `/private/var/...` for `/var/...`).
///
/// Returns `None` if the path cannot be related to `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(slashed(rel));
    }

    if let (Ok(root_canon), Ok(path_canon)) = (root.canonicalize(), path.canonicalize()) {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            return Some(slashed(rel));
        }
    }

    None
}

/// Re-anchor an event path onto `root`, so it matches graph keys.
///
/// Removed files cannot be canonicalized; their event paths must already
/// start with `root`.
pub fn rebase_on_root(root: &Path, path: &Path) -> Option<PathBuf> {
    let rel = relative_str(root, path)?;
    if rel.is_empty() {
        return None;
    }
    Some(rel.split('/').fold(root.to_path_buf(), |acc, seg| acc.join(seg)))
}

fn slashed(rel: &Path) -> String {
    rel.to_string_lossy().replace('\\', "/")
}
