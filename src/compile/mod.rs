// src/compile/mod.rs

//! Template compilation layer.
//!
//! - [`TemplateCompiler`] is the seam the dispatcher talks to. Production uses
//!   [`CommandCompiler`], which runs the external Pug compiler; tests swap in
//!   a fake that never spawns a process.
//! - [`output`] wraps compiled source into a module and writes it, along with
//!   the shared runtime-helper module.

pub mod command;
pub mod output;

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use thiserror::Error;

pub use command::CommandCompiler;
pub use output::{helpers_module, wrap_module, OutputWriter};

/// Why a single template could not be compiled.
///
/// These never abort the watch loop; the dispatcher reports them and moves on.
#[derive(Error, Debug)]
pub enum CompileError {
    /// The compiler ran and rejected the template.
    #[error("{0}")]
    Failed(String),

    #[error("failed to start compiler `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("reading template {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("compiler output for {0:?} is not valid UTF-8")]
    NonUtf8(PathBuf),
}

pub type CompileFuture<'a> = Pin<Box<dyn Future<Output = Result<String, CompileError>> + Send + 'a>>;

/// Turns one template file into client-side JavaScript source.
pub trait TemplateCompiler: Send {
    fn compile<'a>(&'a mut self, path: &'a Path) -> CompileFuture<'a>;
}
