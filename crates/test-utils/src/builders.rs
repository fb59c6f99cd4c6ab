#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use pugwatch::compile::TemplateCompiler;
use pugwatch::engine::{Clock, Dispatcher, DispatcherOptions};
use pugwatch::fs::mock::MockFileSystem;
use pugwatch::fs::FileSystem;
use pugwatch::graph::{DependencyGraph, GraphBuilder};
use pugwatch::types::ModuleFormat;

/// Root of the in-memory template tree.
pub const MOCK_ROOT: &str = "/tpl/raw";
/// Output directory used by [`DispatcherBuilder`].
pub const MOCK_OUT: &str = "/tpl/compiled";

/// Builder for an in-memory template tree under [`MOCK_ROOT`].
pub struct TemplateTree {
    fs: MockFileSystem,
    root: PathBuf,
}

impl TemplateTree {
    pub fn new() -> Self {
        let fs = MockFileSystem::new();
        fs.add_dir(MOCK_ROOT);
        Self {
            fs,
            root: PathBuf::from(MOCK_ROOT),
        }
    }

    /// Add a file at `rel` (relative to the root) with `text`.
    pub fn file(self, rel: &str, text: &str) -> Self {
        self.fs.add_file(self.root.join(rel), text);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    pub fn fs(&self) -> MockFileSystem {
        self.fs.clone()
    }

    pub fn graph(&self) -> DependencyGraph {
        GraphBuilder::new(&self.root, "pug")
            .build(&self.fs)
            .expect("mock tree should always build")
    }
}

impl Default for TemplateTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a [`Dispatcher`] over a [`TemplateTree`].
pub struct DispatcherBuilder {
    wait: Duration,
    format: ModuleFormat,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self {
            wait: Duration::from_millis(1000),
            format: ModuleFormat::Esm,
        }
    }

    pub fn wait_ms(mut self, ms: u64) -> Self {
        self.wait = Duration::from_millis(ms);
        self
    }

    pub fn format(mut self, format: ModuleFormat) -> Self {
        self.format = format;
        self
    }

    pub fn options(&self) -> DispatcherOptions {
        DispatcherOptions {
            out_dir: PathBuf::from(MOCK_OUT),
            output_extension: "js".to_string(),
            format: self.format,
            wait: self.wait,
        }
    }

    pub fn build<C, K>(self, tree: &TemplateTree, compiler: C, clock: K) -> Dispatcher<C>
    where
        C: TemplateCompiler,
        K: Clock + 'static,
    {
        let fs: Arc<dyn FileSystem> = Arc::new(tree.fs());
        Dispatcher::new(tree.graph(), fs, compiler, Arc::new(clock), self.options())
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
