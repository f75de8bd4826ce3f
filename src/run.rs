//! Run-scoped scan state.
//!
//! Every top-level scan creates a fresh [`ScanRun`]. It holds the included
//! file and directory counts, the skipped paths grouped by reason, and the
//! hard-link seen-set. All of it sits behind one mutex so parallel workers
//! update it exactly. Nothing here is process-wide: two scans never share
//! a run.
//!
//! Skipped paths are gathered per directory in a [`SkipLog`] and merged
//! parent-first, in enumeration order, before they reach the run. The lists
//! therefore come out in walk order no matter which worker finished first.

use crate::classify::{InodeKey, SkipReason};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation flag, cheap to clone and share with other threads.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the scan to stop as soon as possible.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Skipped paths grouped by reason, in the order they were recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipLog(BTreeMap<SkipReason, Vec<PathBuf>>);

impl SkipLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, reason: SkipReason, path: PathBuf) {
        self.0.entry(reason).or_default().push(path);
    }

    /// Moves every entry of `later` behind this log's entries.
    pub fn append(&mut self, later: SkipLog) {
        for (reason, mut paths) in later.0 {
            self.0.entry(reason).or_default().append(&mut paths);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Default)]
struct RunState {
    file_count: u64,
    directory_count: u64,
    skipped: BTreeMap<SkipReason, Vec<PathBuf>>,
    seen_inodes: HashSet<InodeKey>,
}

/// Mutable bookkeeping for one scan invocation.
#[derive(Debug, Default)]
pub struct ScanRun {
    state: Mutex<RunState>,
    cancel: CancelToken,
}

impl ScanRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel_token(cancel: CancelToken) -> Self {
        Self {
            state: Mutex::new(RunState::default()),
            cancel,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn record_file(&self) {
        self.state.lock().file_count += 1;
    }

    pub fn record_directory(&self) {
        self.state.lock().directory_count += 1;
    }

    /// Appends a subtree's skips behind those already recorded.
    pub fn record_skips(&self, log: SkipLog) {
        let mut state = self.state.lock();
        for (reason, mut paths) in log.0 {
            state.skipped.entry(reason).or_default().append(&mut paths);
        }
    }

    /// Returns `true` the first time `key` is seen in this run.
    pub fn first_sighting(&self, key: InodeKey) -> bool {
        self.state.lock().seen_inodes.insert(key)
    }

    /// Consumes the run and returns its counts.
    pub fn finish(self) -> RunSummary {
        let state = self.state.into_inner();
        RunSummary {
            file_count: state.file_count,
            directory_count: state.directory_count,
            skipped: state.skipped,
        }
    }
}

/// Final counts of a completed scan.
///
/// # Fields
/// * `file_count` - Included files (the scan root is never counted)
/// * `directory_count` - Included directories below the root
/// * `skipped` - Skipped entry paths, grouped by reason
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub file_count: u64,
    pub directory_count: u64,
    pub skipped: BTreeMap<SkipReason, Vec<PathBuf>>,
}

impl RunSummary {
    /// Paths skipped for `reason`, or an empty slice.
    pub fn skipped_for(&self, reason: SkipReason) -> &[PathBuf] {
        self.skipped.get(&reason).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total_skipped(&self) -> usize {
        self.skipped.values().map(Vec::len).sum()
    }
}
