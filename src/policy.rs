//! Scan policy: the immutable configuration a single scan runs under.
//!
//! A [`ScanPolicy`] is resolved once, before the walk starts, and every
//! recursive step of that scan reads the same instance. It carries no
//! behavior beyond the exclusion-prefix test; OS detection lives in
//! [`crate::profile`].

use crate::utils::{fold_case, normalize_path};
use std::path::{Path, PathBuf};

/// Configuration consumed by the classifier and the tree builder.
///
/// # Fields
/// * `follow_symlinks` - Recorded for completeness; symlinks are never traversed
/// * `skip_hidden` - Skip dotfiles and entries with the OS hidden/system attribute
/// * `min_file_size_bytes` - Files strictly smaller than this are skipped (0 disables)
/// * `on_disk_size_enabled` - Report allocated size instead of logical length
/// * `case_fold` - Compare exclusion paths case-insensitively
/// * `dedup_hard_links` - Count each (device, inode) pair only once per run
#[derive(Debug, Clone, Default)]
pub struct ScanPolicy {
    excluded_paths: Vec<PathBuf>,
    pub follow_symlinks: bool,
    pub skip_hidden: bool,
    pub min_file_size_bytes: u64,
    pub on_disk_size_enabled: bool,
    pub case_fold: bool,
    pub dedup_hard_links: bool,
}

impl ScanPolicy {
    /// Creates a policy with nothing excluded and logical sizes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds exclusion prefixes. Each path is normalized on the way in;
    /// paths that cannot be made absolute are ignored.
    pub fn with_excluded_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            if let Ok(normalized) = normalize_path(path.as_ref()) {
                if !self.excluded_paths.contains(&normalized) {
                    self.excluded_paths.push(normalized);
                }
            }
        }
        self
    }

    pub fn with_skip_hidden(mut self, skip_hidden: bool) -> Self {
        self.skip_hidden = skip_hidden;
        self
    }

    pub fn with_min_file_size(mut self, bytes: u64) -> Self {
        self.min_file_size_bytes = bytes;
        self
    }

    pub fn with_on_disk_size(mut self, enabled: bool) -> Self {
        self.on_disk_size_enabled = enabled;
        self
    }

    pub fn with_case_fold(mut self, case_fold: bool) -> Self {
        self.case_fold = case_fold;
        self
    }

    pub fn with_dedup_hard_links(mut self, enabled: bool) -> Self {
        self.dedup_hard_links = enabled;
        self
    }

    /// The normalized exclusion prefixes, in insertion order.
    pub fn excluded_paths(&self) -> &[PathBuf] {
        &self.excluded_paths
    }

    /// Returns `true` if `path` equals an excluded prefix or lies beneath one.
    ///
    /// `path` must already be absolute and normalized. Matching is
    /// component-wise, so `/proc` excludes `/proc/1` but not `/processes`.
    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.case_fold {
            let folded = fold_case(path);
            self.excluded_paths
                .iter()
                .any(|excluded| folded.starts_with(fold_case(excluded)))
        } else {
            self.excluded_paths
                .iter()
                .any(|excluded| path.starts_with(excluded))
        }
    }
}
