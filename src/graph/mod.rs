// src/graph/mod.rs

//! Template dependency graph.
//!
//! - [`includes`] pulls raw include targets out of template text.
//! - [`discover`] enumerates template files under the watched root.
//! - [`builder`] turns both into a [`DependencyGraph`] mapping every included
//!   file to the top-level templates that must be recompiled when it changes.

pub mod builder;
pub mod discover;
pub mod includes;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;

pub use builder::GraphBuilder;
pub use discover::{depth_of, discover_templates, TemplateFilter};
pub use includes::{parse_includes, resolve_include, DirectiveParser, IncludeParser};

/// A template discovered under the watched root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub path: PathBuf,
    /// Path segments relative to the root; files directly under it have depth 1.
    pub depth: usize,
    /// True when at least one other template includes this one.
    pub is_include: bool,
}

/// `included` is textually included by `including`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct IncludeEdge {
    pub included: PathBuf,
    pub including: PathBuf,
}

/// `file`, reached through `included_by`, must be recompiled via `parent`.
///
/// After construction `parent` never has includers of its own.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AncestorRecord {
    pub file: PathBuf,
    pub included_by: PathBuf,
    pub parent: PathBuf,
}

/// Include relationships for one watch session.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    root: PathBuf,
    /// Discovered templates, in processing (depth) order.
    order: Vec<PathBuf>,
    files: BTreeMap<PathBuf, TemplateFile>,
    roots: BTreeSet<PathBuf>,
    edges: BTreeSet<IncludeEdge>,
    records: BTreeMap<PathBuf, BTreeSet<AncestorRecord>>,
}

impl DependencyGraph {
    pub(crate) fn empty(root: PathBuf) -> Self {
        Self {
            root,
            ..Self::default()
        }
    }

    /// Discover and parse every template under `root`.
    pub fn build(
        fs: &dyn crate::fs::FileSystem,
        root: impl Into<PathBuf>,
        extension: &str,
    ) -> anyhow::Result<Self> {
        GraphBuilder::new(root, extension).build(fs)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discovered templates, shallowest first.
    pub fn files(&self) -> impl Iterator<Item = &TemplateFile> {
        self.order.iter().filter_map(|p| self.files.get(p))
    }

    pub fn file(&self, path: &Path) -> Option<&TemplateFile> {
        self.files.get(path)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn roots(&self) -> impl Iterator<Item = &Path> {
        self.roots.iter().map(PathBuf::as_path)
    }

    pub fn is_root(&self, path: &Path) -> bool {
        self.roots.contains(path)
    }

    pub fn edges(&self) -> impl Iterator<Item = &IncludeEdge> {
        self.edges.iter()
    }

    /// Every ancestor record, grouped by file.
    pub fn records(&self) -> impl Iterator<Item = &AncestorRecord> {
        self.records.values().flatten()
    }

    pub fn records_for(&self, file: &Path) -> impl Iterator<Item = &AncestorRecord> {
        self.records.get(file).into_iter().flatten()
    }

    /// Distinct ancestors that must be recompiled when `file` changes.
    ///
    /// Empty for files nobody includes.
    pub fn ancestors_of(&self, file: &Path) -> BTreeSet<&Path> {
        self.records_for(file).map(|r| r.parent.as_path()).collect()
    }

    pub(crate) fn register_file(&mut self, path: PathBuf, depth: usize) {
        if self.files.contains_key(&path) {
            return;
        }
        if depth == 1 {
            self.roots.insert(path.clone());
        }
        self.order.push(path.clone());
        self.files.insert(
            path.clone(),
            TemplateFile {
                path,
                depth,
                is_include: false,
            },
        );
    }

    pub(crate) fn register_edge(&mut self, included: &Path, including: &Path) {
        self.edges.insert(IncludeEdge {
            included: included.to_path_buf(),
            including: including.to_path_buf(),
        });
    }

    pub(crate) fn insert_record(&mut self, record: AncestorRecord) {
        self.records
            .entry(record.file.clone())
            .or_default()
            .insert(record);
    }

    pub(crate) fn mark_includes(&mut self) {
        for (path, file) in self.files.iter_mut() {
            file.is_include = self.records.contains_key(path);
        }
    }

    pub(crate) fn take_records(&mut self) -> BTreeMap<PathBuf, BTreeSet<AncestorRecord>> {
        std::mem::take(&mut self.records)
    }

    /// Groups of templates that include each other, directly or transitively.
    ///
    /// Cycles are tolerated by the builder; this is for diagnostics.
    pub fn include_cycles(&self) -> Vec<Vec<PathBuf>> {
        let mut graph: DiGraphMap<&Path, ()> = DiGraphMap::new();
        for edge in &self.edges {
            graph.add_edge(edge.including.as_path(), edge.included.as_path(), ());
        }

        tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut members: Vec<PathBuf> = scc.into_iter().map(Path::to_path_buf).collect();
                members.sort();
                members
            })
            .collect()
    }
}
