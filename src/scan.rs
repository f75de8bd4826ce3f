//! File system scanning module for `spacebrowser`.
//!
//! This module handles:
//! - Validating and normalizing the scan root
//! - Depth-first tree construction with bottom-up size aggregation
//! - Per-entry classification and skip bookkeeping via [`ScanRun`]
//! - Parallel subdirectory walks on a scan-local, size-capped rayon pool
//!
//! The main entry point is [`scan`], which returns a [`ScanReport`] holding:
//! - The root [`Node`], with every directory's children sorted by size
//! - A [`RunSummary`] with included file/directory counts and skipped paths
//!
//! The parallel walk recurses through rayon only for the first
//! [`PARALLEL_DEPTH_LIMIT`] levels. Deeper subtrees are built by an
//! iterative walk with an explicit stack, so tree depth is bounded by memory
//! rather than by worker stack size.
//!
//! Unreadable directories become empty nodes and never abort the scan.
//! Only an invalid root, a cancelled scan, or a pool setup failure is an error.

use crate::classify::{Classification, Entry, SkipReason, classify};
use crate::data::Node;
use crate::error::ScanError;
use crate::filesystem::{FileSystem, OsFileSystem, RootKind};
use crate::policy::ScanPolicy;
use crate::run::{CancelToken, RunSummary, ScanRun, SkipLog};
use crate::thread_pool::{WorkerStrategy, build_pool};
use crate::utils::{display_name, normalize_path};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Directory depth, counted from the scan root, below which subtrees are
/// built iteratively on the current worker instead of through rayon.
pub const PARALLEL_DEPTH_LIMIT: usize = 64;

/// Knobs that affect how a scan runs but not what it produces.
///
/// # Fields
/// * `workers` - Size of the scan-local worker pool (1 = sequential walk)
/// * `cancel` - Token the caller can trip to abort the scan
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub workers: usize,
    pub cancel: CancelToken,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            workers: WorkerStrategy::Default.worker_count(None),
            cancel: CancelToken::new(),
        }
    }
}

impl ScanOptions {
    pub fn sequential() -> Self {
        Self {
            workers: 1,
            ..Self::default()
        }
    }
}

/// The outcome of a completed scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub root: Node,
    pub summary: RunSummary,
}

/// Scans `root` on the real filesystem.
///
/// # Arguments
/// * `root` - Absolute or relative path; resolved to a normalized absolute path
/// * `policy` - Classification policy, shared unchanged by the whole walk
/// * `options` - Worker count and cancellation
///
/// # Errors
/// * [`ScanError::InvalidRoot`] if `root` does not resolve to a directory
/// * [`ScanError::Cancelled`] if the cancel token was tripped mid-walk
/// * [`ScanError::ThreadPool`] if the worker pool could not be created
pub fn scan(root: &Path, policy: &ScanPolicy, options: &ScanOptions) -> Result<ScanReport, ScanError> {
    scan_with(&OsFileSystem, root, policy, options)
}

/// Same as [`scan`], against any [`FileSystem`].
///
/// With hard-link de-duplication enabled the walk is always sequential: the
/// first link met in walk order is kept, so repeated scans agree on which
/// copy counts.
pub fn scan_with<F: FileSystem>(
    fs: &F,
    root: &Path,
    policy: &ScanPolicy,
    options: &ScanOptions,
) -> Result<ScanReport, ScanError> {
    let root_path = normalize_path(root).map_err(|_| ScanError::InvalidRoot {
        path: root.to_path_buf(),
    })?;

    let kind = fs.inspect_root(&root_path);
    if kind == RootKind::Invalid {
        return Err(ScanError::InvalidRoot { path: root_path });
    }

    info!("Scanning {}", root_path.display());
    let start = Instant::now();
    let run = ScanRun::with_cancel_token(options.cancel.clone());

    let tree = if kind == RootKind::SymlinkToDirectory {
        debug!("Root {} is a symlink; not traversing it", root_path.display());
        Node::empty_directory(display_name(&root_path), root_path, 0)
    } else if policy.dedup_hard_links {
        debug!("Hard-link de-duplication enabled; walking sequentially");
        TreeBuilder::new(fs, policy).build_tree_sequential(root_path, 0, &run)?
    } else {
        let pool = build_pool(options.workers)?;
        let builder = TreeBuilder::new(fs, policy);
        pool.install(|| builder.build_tree(root_path, 0, &run))?
    };

    let summary = run.finish();
    for (reason, paths) in &summary.skipped {
        info!("Skipped {} entries for {}", paths.len(), reason);
    }
    info!(
        "Scan complete: {} files, {} folders, {} bytes in {:?}",
        summary.file_count,
        summary.directory_count,
        tree.size(),
        start.elapsed()
    );

    Ok(ScanReport {
        root: tree,
        summary,
    })
}

/// An admitted child whose node is not built yet.
enum Pending {
    Leaf(Node),
    Subdirectory(PathBuf),
}

/// One directory's admitted children and the skips found while listing it.
struct Listing {
    name: String,
    path: PathBuf,
    depth: usize,
    pending: Vec<Pending>,
    skipped: SkipLog,
}

/// A directory on the explicit stack of the iterative walk.
struct Frame {
    name: String,
    path: PathBuf,
    depth: usize,
    remaining: std::vec::IntoIter<Pending>,
    children: Vec<Node>,
    skipped: SkipLog,
}

impl Frame {
    fn open(listing: Listing) -> Self {
        Self {
            children: Vec::with_capacity(listing.pending.len()),
            remaining: listing.pending.into_iter(),
            name: listing.name,
            path: listing.path,
            depth: listing.depth,
            skipped: listing.skipped,
        }
    }

    fn close(self) -> (Node, SkipLog) {
        (
            Node::directory(self.name, self.path, self.depth, self.children),
            self.skipped,
        )
    }
}

/// Recursive walker producing size-aggregated [`Node`] trees.
pub struct TreeBuilder<'a, F: FileSystem> {
    fs: &'a F,
    policy: &'a ScanPolicy,
}

impl<'a, F: FileSystem> TreeBuilder<'a, F> {
    pub fn new(fs: &'a F, policy: &'a ScanPolicy) -> Self {
        Self { fs, policy }
    }

    /// Builds the directory node for `path` and everything beneath it, and
    /// records the subtree's skips in `run`.
    ///
    /// Children are classified in enumeration order; subdirectories are then
    /// built in parallel on the current rayon pool. The node is returned only
    /// once every descendant has completed.
    ///
    /// # Errors
    /// Only [`ScanError::Cancelled`]. A directory that cannot be listed is
    /// returned as an empty, zero-sized node.
    pub fn build_tree(&self, path: PathBuf, depth: usize, run: &ScanRun) -> Result<Node, ScanError> {
        let (node, skipped) = self.build_parallel(path, depth, run)?;
        run.record_skips(skipped);
        Ok(node)
    }

    /// Same result as [`TreeBuilder::build_tree`], walked on the calling
    /// thread in enumeration order.
    pub fn build_tree_sequential(
        &self,
        path: PathBuf,
        depth: usize,
        run: &ScanRun,
    ) -> Result<Node, ScanError> {
        let (node, skipped) = self.build_iterative(path, depth, run)?;
        run.record_skips(skipped);
        Ok(node)
    }

    fn build_parallel(&self, path: PathBuf, depth: usize, run: &ScanRun) -> Result<(Node, SkipLog), ScanError> {
        if depth >= PARALLEL_DEPTH_LIMIT {
            return self.build_iterative(path, depth, run);
        }

        let listing = self.list(path, depth, run)?;
        let built = listing
            .pending
            .into_par_iter()
            .map(|child| match child {
                Pending::Leaf(node) => Ok((node, None)),
                Pending::Subdirectory(sub) => self
                    .build_parallel(sub, depth + 1, run)
                    .map(|(node, skipped)| (node, Some(skipped))),
            })
            .collect::<Result<Vec<_>, ScanError>>()?;

        let mut skipped = listing.skipped;
        let mut children = Vec::with_capacity(built.len());
        for (node, child_skipped) in built {
            if let Some(child_skipped) = child_skipped {
                skipped.append(child_skipped);
            }
            children.push(node);
        }

        Ok((
            Node::directory(listing.name, listing.path, depth, children),
            skipped,
        ))
    }

    /// Depth-first walk with an explicit stack of open directories.
    fn build_iterative(&self, path: PathBuf, depth: usize, run: &ScanRun) -> Result<(Node, SkipLog), ScanError> {
        let mut current = Frame::open(self.list(path, depth, run)?);
        let mut ancestors: Vec<Frame> = Vec::new();

        loop {
            match current.remaining.next() {
                Some(Pending::Leaf(node)) => current.children.push(node),
                Some(Pending::Subdirectory(sub)) => {
                    let child = Frame::open(self.list(sub, current.depth + 1, run)?);
                    ancestors.push(std::mem::replace(&mut current, child));
                }
                None => {
                    let (node, skipped) = current.close();
                    match ancestors.pop() {
                        Some(parent) => {
                            current = parent;
                            current.children.push(node);
                            current.skipped.append(skipped);
                        }
                        None => return Ok((node, skipped)),
                    }
                }
            }
        }
    }

    /// Lists `path` and classifies its entries in enumeration order.
    fn list(&self, path: PathBuf, depth: usize, run: &ScanRun) -> Result<Listing, ScanError> {
        if run.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        let mut listing = Listing {
            name: display_name(&path),
            path,
            depth,
            pending: Vec::new(),
            skipped: SkipLog::new(),
        };
        let entries = match self.fs.read_dir(&listing.path) {
            Ok(entries) => entries,
            Err(err) => {
                debug!("Cannot read {}: {}", listing.path.display(), err);
                return Ok(listing);
            }
        };

        for entry in &entries {
            if let Some(pending) = self.admit(entry, depth, run, &mut listing.skipped) {
                listing.pending.push(pending);
            }
        }
        Ok(listing)
    }

    /// Classifies one entry, counting it in `run` or logging it in `skipped`.
    fn admit(&self, entry: &F::Entry, depth: usize, run: &ScanRun, skipped: &mut SkipLog) -> Option<Pending> {
        let path = entry.path();
        match classify(entry, self.policy) {
            Classification::Skip(reason) => {
                skipped.push(reason, path.to_path_buf());
                None
            }
            Classification::Directory => {
                run.record_directory();
                Some(Pending::Subdirectory(path.to_path_buf()))
            }
            Classification::File { size_bytes, inode } => {
                if self.policy.dedup_hard_links {
                    if let Some(key) = inode {
                        if !run.first_sighting(key) {
                            skipped.push(SkipReason::HardLink, path.to_path_buf());
                            return None;
                        }
                    }
                }
                run.record_file();
                Some(Pending::Leaf(Node::file(
                    display_name(path),
                    path.to_path_buf(),
                    size_bytes,
                    depth + 1,
                )))
            }
        }
    }
}
