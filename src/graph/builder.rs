// src/graph/builder.rs

//! Dependency graph construction.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::fs::FileSystem;
use crate::graph::discover::{depth_of, discover_templates, TemplateFilter};
use crate::graph::includes::{normalize_path, resolve_include, DirectiveParser, IncludeParser};
use crate::graph::{AncestorRecord, DependencyGraph};

/// Builds a [`DependencyGraph`] from a directory tree or from in-memory
/// sources.
#[derive(Debug)]
pub struct GraphBuilder {
    root: PathBuf,
    extension: String,
    parser: Box<dyn IncludeParser>,
}

impl GraphBuilder {
    pub fn new(root: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            root: normalize_path(&root.into()),
            extension: extension.trim_start_matches('.').to_string(),
            parser: Box::new(DirectiveParser),
        }
    }

    pub fn with_parser(mut self, parser: impl IncludeParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    /// Discover every template under the root, read each once, and build.
    ///
    /// Unreadable files are still registered but contribute no includes.
    pub fn build(&self, fs: &dyn FileSystem) -> Result<DependencyGraph> {
        let filter = TemplateFilter::new(&self.extension)?;
        let files = discover_templates(fs, &self.root, &filter)?;
        debug!(count = files.len(), root = ?self.root, "discovered templates");

        let sources = files.into_iter().map(|path| {
            let text = match fs.read_to_string(&path) {
                Ok(text) => text,
                Err(err) => {
                    warn!(file = ?path, error = %err, "could not read template; ignoring its includes");
                    String::new()
                }
            };
            (path, text)
        });

        Ok(self.build_from_sources(sources))
    }

    /// Build from `(path, text)` pairs without touching any filesystem.
    pub fn build_from_sources<I>(&self, sources: I) -> DependencyGraph
    where
        I: IntoIterator<Item = (PathBuf, String)>,
    {
        let mut entries: Vec<(usize, PathBuf, String)> = sources
            .into_iter()
            .map(|(path, text)| {
                let path = normalize_path(&path);
                (depth_of(&self.root, &path), path, text)
            })
            .collect();

        // Shallow files first so includers' ancestors are known before
        // their own includes are registered.
        entries.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        let mut graph = DependencyGraph::empty(self.root.clone());
        for (depth, path, _) in &entries {
            graph.register_file(path.clone(), *depth);
        }

        for (_, including, text) in &entries {
            for raw in self.parser.parse(text) {
                let included = resolve_include(&self.root, including, raw, &self.extension);
                graph.register_edge(&included, including);

                let known: Vec<PathBuf> = graph
                    .ancestors_of(including)
                    .into_iter()
                    .map(Path::to_path_buf)
                    .collect();

                if known.is_empty() {
                    graph.insert_record(AncestorRecord {
                        file: included,
                        included_by: including.clone(),
                        parent: including.clone(),
                    });
                } else {
                    for ancestor in known {
                        graph.insert_record(AncestorRecord {
                            file: included.clone(),
                            included_by: including.clone(),
                            parent: ancestor,
                        });
                    }
                }
            }
        }

        propagate_to_tops(&mut graph);
        graph.mark_includes();

        for cycle in graph.include_cycles() {
            warn!(?cycle, "include cycle detected; ancestors inside it may be imprecise");
        }

        info!(
            files = graph.len(),
            roots = graph.roots().count(),
            records = graph.records().count(),
            "dependency graph built"
        );

        graph
    }
}

/// Re-point every record at the tops of its includer's include chain.
///
/// The depth-ordered pass only knows the ancestors registered so far, so a
/// record can point at a non-top parent or miss a top reached through an
/// includer that sits deeper in the tree.
fn propagate_to_tops(graph: &mut DependencyGraph) {
    let mut includers: BTreeMap<PathBuf, BTreeSet<PathBuf>> = BTreeMap::new();
    for edge in graph.edges() {
        includers
            .entry(edge.included.clone())
            .or_default()
            .insert(edge.including.clone());
    }

    for record in graph.take_records().into_values().flatten() {
        for top in lift(&includers, &record.included_by) {
            graph.insert_record(AncestorRecord {
                file: record.file.clone(),
                included_by: record.included_by.clone(),
                parent: top,
            });
        }
    }
}

/// Walk upwards from `start` through direct includers and return the ones
/// nobody includes.
///
/// A cycle with no way out keeps `start`.
fn lift(includers: &BTreeMap<PathBuf, BTreeSet<PathBuf>>, start: &Path) -> BTreeSet<PathBuf> {
    let mut tops = BTreeSet::new();
    let mut stack: Vec<&Path> = vec![start];
    let mut visited: HashSet<&Path> = HashSet::new();

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }

        let ups: Vec<&Path> = includers
            .get(current)
            .into_iter()
            .flatten()
            .map(PathBuf::as_path)
            .filter(|p| *p != current)
            .collect();

        if ups.is_empty() {
            tops.insert(current.to_path_buf());
        } else {
            stack.extend(ups);
        }
    }

    if tops.is_empty() {
        tops.insert(start.to_path_buf());
    }
    tops
}
