// src/graph/discover.rs

//! Template discovery under the watched root.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};

use crate::fs::FileSystem;
use crate::watch::path_utils::relative_str;

/// Compiled `**/*.<ext>` matcher shared by discovery and the watcher.
#[derive(Debug, Clone)]
pub struct TemplateFilter {
    extension: String,
    matcher: GlobMatcher,
}

impl TemplateFilter {
    pub fn new(extension: &str) -> Result<Self> {
        let extension = extension.trim_start_matches('.').to_string();
        let pattern = format!("**/*.{extension}");
        let matcher = Glob::new(&pattern)
            .with_context(|| format!("invalid glob pattern: {pattern}"))?
            .compile_matcher();
        Ok(Self { extension, matcher })
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// `rel` is a forward-slash path relative to the watched root.
    pub fn matches(&self, rel: &str) -> bool {
        self.matcher.is_match(rel)
    }
}

/// Number of path segments between `root` and `file` (`root/a.pug` is 1).
pub fn depth_of(root: &Path, file: &Path) -> usize {
    file.strip_prefix(root)
        .map(|rel| rel.components().count())
        .unwrap_or_else(|_| file.components().count())
}

/// Collect every template file under `root`, recursively.
///
/// Order is unspecified; the graph builder sorts by depth.
pub fn discover_templates(
    fs: &dyn FileSystem,
    root: &Path,
    filter: &TemplateFilter,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            if fs.is_dir(&path) {
                stack.push(path);
            } else if fs.is_file(&path) {
                if let Some(rel) = relative_str(root, &path) {
                    if filter.matches(&rel) {
                        files.push(path);
                    }
                }
            }
        }
    }

    Ok(files)
}
