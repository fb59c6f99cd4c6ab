// src/engine/debounce.rs

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::trace;

/// How many compile attempts the ledger remembers, across all files.
pub const LEDGER_CAPACITY: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub file: PathBuf,
    pub compiled_at: Instant,
}

/// Recent compile attempts, used to suppress recompiling the same file
/// within the debounce window.
///
/// Semantics:
/// - Bounded globally, not per file: a burst touching many distinct files
///   can evict an older file's entry, after which that file is no longer
///   suppressed.
/// - Entries older than the window are ignored but stay until evicted.
#[derive(Debug)]
pub struct DebounceLedger {
    capacity: usize,
    entries: VecDeque<LedgerEntry>,
}

impl Default for DebounceLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl DebounceLedger {
    pub fn new() -> Self {
        Self::with_capacity(LEDGER_CAPACITY)
    }

    /// `capacity` is clamped to at least 1.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// True if `file` was compiled at most `window` before `now`.
    pub fn should_suppress(&self, file: &Path, now: Instant, window: Duration) -> bool {
        self.entries
            .iter()
            .filter(|e| e.file == file)
            .any(|e| now.saturating_duration_since(e.compiled_at) <= window)
    }

    /// Remember a compile attempt, evicting the oldest entries beyond capacity.
    pub fn record(&mut self, file: &Path, now: Instant) {
        self.entries.push_back(LedgerEntry {
            file: file.to_path_buf(),
            compiled_at: now,
        });

        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                trace!(file = ?evicted.file, "evicted debounce entry");
            }
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
