use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use pugwatch::compile::{CompileError, CompileFuture, TemplateCompiler};

/// Prefix the fake puts before the template function, standing in for the
/// runtime functions a real Pug compiler inlines.
pub const FAKE_RUNTIME_PREFIX: &str = "function pug_escape(e){return e}\n";

/// A fake compiler that:
/// - records every path it was asked to compile
/// - returns a deterministic template function naming the path
/// - fails for paths registered with [`FakeCompiler::fail_on`]
#[derive(Debug, Clone, Default)]
pub struct FakeCompiler {
    compiled: Arc<Mutex<Vec<PathBuf>>>,
    failing: Arc<Mutex<HashSet<PathBuf>>>,
}

impl FakeCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the list of compiled paths, in call order.
    pub fn compiled(&self) -> Arc<Mutex<Vec<PathBuf>>> {
        Arc::clone(&self.compiled)
    }

    pub fn compiled_paths(&self) -> Vec<PathBuf> {
        self.compiled.lock().unwrap().clone()
    }

    pub fn fail_on(&self, path: impl Into<PathBuf>) {
        self.failing.lock().unwrap().insert(path.into());
    }

    pub fn clear_failures(&self) {
        self.failing.lock().unwrap().clear();
    }

    /// The source the fake returns for `path`.
    pub fn output_for(path: &Path) -> String {
        format!(
            "{FAKE_RUNTIME_PREFIX}function template(locals) {{ return \"{}\"; }}",
            path.display()
        )
    }
}

impl TemplateCompiler for FakeCompiler {
    fn compile<'a>(&'a mut self, path: &'a Path) -> CompileFuture<'a> {
        let compiled = Arc::clone(&self.compiled);
        let failing = Arc::clone(&self.failing);

        Box::pin(async move {
            compiled.lock().unwrap().push(path.to_path_buf());

            if failing.lock().unwrap().contains(path) {
                return Err(CompileError::Failed(format!(
                    "{}:1\nunexpected token",
                    path.display()
                )));
            }
            Ok(Self::output_for(path))
        })
    }
}
