// src/watch/settle.rs

//! Write-settle buffering.
//!
//! Editors and build tools often write a file in several steps. A path is
//! only released once it has been quiet for the stability threshold, so one
//! save produces one compile.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::types::ChangeKind;

#[derive(Debug, Clone, Copy)]
struct PendingChange {
    kind: ChangeKind,
    first_seen: Instant,
    last_seen: Instant,
}

#[derive(Debug)]
pub struct SettleBuffer {
    threshold: Duration,
    pending: HashMap<PathBuf, PendingChange>,
}

impl SettleBuffer {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            pending: HashMap::new(),
        }
    }

    /// Note a raw event for `path`, restarting its quiet period.
    pub fn note(&mut self, path: &Path, kind: ChangeKind, now: Instant) {
        match self.pending.get_mut(path) {
            Some(entry) => {
                entry.kind = merge_kinds(entry.kind, kind);
                entry.last_seen = now;
            }
            None => {
                self.pending.insert(
                    path.to_path_buf(),
                    PendingChange {
                        kind,
                        first_seen: now,
                        last_seen: now,
                    },
                );
            }
        }
    }

    /// Remove and return every path quiet for at least the threshold, in the
    /// order they were first seen.
    pub fn drain_settled(&mut self, now: Instant) -> Vec<(PathBuf, ChangeKind)> {
        let threshold = self.threshold;
        let mut settled: Vec<(PathBuf, PendingChange)> = Vec::new();
        self.pending.retain(|path, change| {
            if now.saturating_duration_since(change.last_seen) >= threshold {
                settled.push((path.clone(), *change));
                false
            } else {
                true
            }
        });

        settled.sort_by(|a, b| a.1.first_seen.cmp(&b.1.first_seen).then_with(|| a.0.cmp(&b.0)));
        settled.into_iter().map(|(path, c)| (path, c.kind)).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Collapse two consecutive raw events on one path into the settled kind.
fn merge_kinds(earlier: ChangeKind, later: ChangeKind) -> ChangeKind {
    match (earlier, later) {
        (ChangeKind::Added, ChangeKind::Changed) => ChangeKind::Added,
        (ChangeKind::Removed, ChangeKind::Added) => ChangeKind::Changed,
        (_, later) => later,
    }
}
