// src/engine/mod.rs

//! Incremental recompilation engine.
//!
//! - [`debounce`] holds the bounded ledger of recent compiles.
//! - [`dispatcher`] maps a changed file to its compile targets and drives the
//!   compiler.
//! - [`runtime`] is the async loop feeding watcher events to the dispatcher.
//! - [`clock`] abstracts "now" so debounce behaviour is testable.

use std::path::PathBuf;

use crate::types::ChangeKind;

/// Events flowing into the runtime from the watcher and signal handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// A settled filesystem change to a template.
    FileChanged { path: PathBuf, kind: ChangeKind },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod clock;
pub mod debounce;
pub mod dispatcher;
pub mod runtime;

pub use clock::{Clock, SystemClock};
pub use debounce::{DebounceLedger, LedgerEntry, LEDGER_CAPACITY};
pub use dispatcher::{CompileReport, CompileStatus, Dispatcher, DispatcherOptions};
pub use runtime::Runtime;
