//! Error type for scan requests.

use std::path::PathBuf;
use thiserror::Error;

/// Failures that stop a scan before a tree is produced.
///
/// Problems with individual entries or subdirectories are never reported
/// here; they are absorbed during the walk.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The root does not exist or is not a directory.
    #[error("Invalid path ({})", .path.display())]
    InvalidRoot { path: PathBuf },

    /// The caller cancelled the scan. No partial tree is returned.
    #[error("Scan was cancelled")]
    Cancelled,

    /// The scan-local worker pool could not be created.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
