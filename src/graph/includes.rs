// src/graph/includes.rs

//! Include directive extraction and path resolution.

use std::fmt::Debug;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// Matches `include path`, `include:filter path` and `extends path` at the
/// start of a line (after indentation).
static DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:include(?::[\w-]+)*|extends)[ \t]+(\S.*?)[ \t\r]*$")
        .expect("include directive regex is valid")
});

/// Something that can pull referenced template paths out of a file's text.
///
/// Graph construction only depends on this trait, so a stricter parser can
/// be swapped in without touching the builder.
pub trait IncludeParser: Send + Sync + Debug {
    /// Raw referenced paths, exactly as written, in source order.
    fn parse<'a>(&self, text: &'a str) -> Box<dyn Iterator<Item = &'a str> + 'a>;
}

/// Default line-oriented parser for `include` / `extends` directives.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectiveParser;

impl IncludeParser for DirectiveParser {
    fn parse<'a>(&self, text: &'a str) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        Box::new(parse_includes(text))
    }
}

/// Lazily yield every include target referenced in `text`.
pub fn parse_includes(text: &str) -> impl Iterator<Item = &str> + '_ {
    DIRECTIVE_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Resolve a raw include path to an absolute, normalized path.
///
/// - relative paths resolve against the including file's directory
/// - a leading `/` resolves against the watched `root`
/// - a path without an extension gets `.{extension}` appended
pub fn resolve_include(root: &Path, including: &Path, raw: &str, extension: &str) -> PathBuf {
    let raw = raw.trim();
    let joined = match raw.strip_prefix('/') {
        Some(rest) => root.join(rest),
        None => including
            .parent()
            .map(|dir| dir.join(raw))
            .unwrap_or_else(|| PathBuf::from(raw)),
    };

    let mut resolved = normalize_path(&joined);
    if resolved.extension().is_none() {
        resolved.set_extension(extension);
    }
    resolved
}

/// Collapse `.` and `..` components without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
