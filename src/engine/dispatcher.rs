// src/engine/dispatcher.rs

//! Change-to-compile routing.
//!
//! The dispatcher owns the dependency graph and the debounce ledger. It is
//! driven by exactly one caller at a time (the runtime loop, or the initial
//! compile pass), so neither needs locking.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::compile::{OutputWriter, TemplateCompiler};
use crate::config::model::ConfigFile;
use crate::engine::clock::Clock;
use crate::engine::debounce::DebounceLedger;
use crate::fs::FileSystem;
use crate::graph::{DependencyGraph, GraphBuilder};
use crate::types::{ChangeKind, ModuleFormat};

/// Output and debounce settings for a [`Dispatcher`].
#[derive(Debug, Clone)]
pub struct DispatcherOptions {
    pub out_dir: PathBuf,
    pub output_extension: String,
    pub format: ModuleFormat,
    /// Recompiles of the same file within this window are suppressed.
    pub wait: Duration,
}

impl DispatcherOptions {
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self {
            out_dir: cfg.out.clone(),
            output_extension: cfg.compile.output_extension.clone(),
            format: cfg.compile.format,
            wait: cfg.wait(),
        }
    }
}

/// What happened to one compile target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileStatus {
    /// Compiled; `written` is false when identical output was already on disk.
    Compiled { output: PathBuf, written: bool },
    /// The compiler rejected the template; no output was written.
    Failed { message: String },
    /// Compiled within the debounce window; skipped.
    Suppressed,
    /// The file vanished before it could be compiled.
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileReport {
    pub target: PathBuf,
    /// True when `target` is compiled on behalf of one of its includes.
    pub is_parent: bool,
    pub status: CompileStatus,
}

impl CompileReport {
    fn new(target: &Path, is_parent: bool, status: CompileStatus) -> Self {
        Self {
            target: target.to_path_buf(),
            is_parent,
            status,
        }
    }

    pub fn attempted(&self) -> bool {
        matches!(
            self.status,
            CompileStatus::Compiled { .. } | CompileStatus::Failed { .. }
        )
    }
}

pub struct Dispatcher<C: TemplateCompiler> {
    graph: DependencyGraph,
    ledger: DebounceLedger,
    fs: Arc<dyn FileSystem>,
    compiler: C,
    clock: Arc<dyn Clock>,
    writer: OutputWriter,
    wait: Duration,
}

impl<C: TemplateCompiler> std::fmt::Debug for Dispatcher<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("graph_files", &self.graph.len())
            .field("ledger", &self.ledger)
            .field("wait", &self.wait)
            .finish_non_exhaustive()
    }
}

impl<C: TemplateCompiler> Dispatcher<C> {
    pub fn new(
        graph: DependencyGraph,
        fs: Arc<dyn FileSystem>,
        compiler: C,
        clock: Arc<dyn Clock>,
        options: DispatcherOptions,
    ) -> Self {
        let writer = OutputWriter::new(options.out_dir, &options.output_extension, options.format);
        Self {
            graph,
            ledger: DebounceLedger::new(),
            fs,
            compiler,
            clock,
            writer,
            wait: options.wait,
        }
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn ledger(&self) -> &DebounceLedger {
        &self.ledger
    }

    /// Replace the graph with a fresh scan.
    ///
    /// Nothing calls this on file events: include edits made mid-session are
    /// only picked up after a rebuild or restart.
    pub fn rebuild_graph(&mut self, builder: &GraphBuilder) -> anyhow::Result<()> {
        self.graph = builder.build(self.fs.as_ref())?;
        Ok(())
    }

    /// Route one changed path to the files that must be recompiled.
    pub async fn on_change(&mut self, path: &Path) -> Vec<CompileReport> {
        self.on_event(path, ChangeKind::Changed).await
    }

    pub async fn on_event(&mut self, path: &Path, kind: ChangeKind) -> Vec<CompileReport> {
        if !self.fs.exists(path) {
            warn!(file = ?path, ?kind, "the template has either been moved or removed");
            return vec![CompileReport::new(path, false, CompileStatus::Missing)];
        }

        let ancestors: Vec<PathBuf> = self
            .graph
            .ancestors_of(path)
            .into_iter()
            .map(Path::to_path_buf)
            .collect();

        if ancestors.is_empty() {
            return vec![self.compile_one(path, false).await];
        }

        debug!(file = ?path, ?ancestors, "change routed to ancestors");
        let mut reports = Vec::with_capacity(ancestors.len());
        for ancestor in ancestors {
            reports.push(self.compile_one(&ancestor, true).await);
        }
        reports
    }

    /// Compile every discovered template once, shallowest first.
    ///
    /// Includes route to their ancestors, so with a non-zero wait each root
    /// is compiled once.
    pub async fn compile_all(&mut self) -> Vec<CompileReport> {
        let files: Vec<PathBuf> = self.graph.files().map(|f| f.path.clone()).collect();
        let mut reports = Vec::new();
        for file in files {
            reports.extend(self.on_event(&file, ChangeKind::Initial).await);
        }
        reports
    }

    /// Compile a single target, subject to the debounce window.
    pub async fn compile_one(&mut self, path: &Path, is_parent: bool) -> CompileReport {
        if !self.fs.exists(path) {
            warn!(file = ?path, "the template has either been moved or removed");
            return CompileReport::new(path, is_parent, CompileStatus::Missing);
        }

        if self
            .ledger
            .should_suppress(path, self.clock.now(), self.wait)
        {
            debug!(file = ?path, "compiled recently; skipping");
            return CompileReport::new(path, is_parent, CompileStatus::Suppressed);
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!(">> Pug compiling{} {}", if is_parent { " (PARENT)" } else { "" }, name);

        let status = match self.compiler.compile(path).await {
            Ok(compiled) => match self.writer.write_module(self.fs.as_ref(), path, &compiled) {
                Ok((output, written)) => CompileStatus::Compiled { output, written },
                Err(err) => {
                    error!(file = ?path, error = %err, "failed to write compiled module");
                    CompileStatus::Failed {
                        message: err.to_string(),
                    }
                }
            },
            Err(err) => {
                error!("{err}");
                CompileStatus::Failed {
                    message: err.to_string(),
                }
            }
        };

        self.ledger.record(path, self.clock.now());
        CompileReport::new(path, is_parent, status)
    }
}
