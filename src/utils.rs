//! Utility functions for the `spacebrowser` scanner.
//!
//! This module provides:
//! - Lexical path normalization (absolute, no `.`/`..` components, symlinks untouched)
//! - Case folding for exclusion comparisons on case-insensitive filesystems
//! - Display names for tree nodes, including the `/` label for filesystem roots
//! - On-disk size calculation from block counts, similar to the `du` command

use std::io;
use std::path::{Component, Path, PathBuf};

/// Size of one allocation unit reported in `st_blocks`.
pub const BLOCK_SIZE: u64 = 512;

/// Resolves `path` to an absolute path and removes `.` and `..` components.
///
/// Unlike [`std::fs::canonicalize`], this never touches the filesystem for
/// symlink resolution, so a symlinked root is still seen as a symlink.
///
/// # Errors
/// Returns an error if the path is empty or the current directory is unavailable.
pub fn normalize_path(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

/// Lower-cases a path for comparison on case-insensitive filesystems.
pub fn fold_case(path: &Path) -> PathBuf {
    PathBuf::from(path.to_string_lossy().to_lowercase())
}

/// Returns `true` if `path` has no parent, i.e. `/` or a drive root like `C:\`.
pub fn is_filesystem_root(path: &Path) -> bool {
    path.is_absolute() && path.parent().is_none()
}

/// Returns the label used for a node: its basename, or a root label when
/// the path has none.
pub fn display_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => match path.components().next() {
            Some(Component::Prefix(prefix)) => {
                format!("{}{}", prefix.as_os_str().to_string_lossy(), std::path::MAIN_SEPARATOR)
            }
            _ => "/".to_string(),
        },
    }
}

/// Returns the allocated size in bytes (`blocks * 512`), falling back to the
/// logical length when the block count is unavailable.
pub fn on_disk_size(blocks: Option<u64>, len: u64) -> u64 {
    match blocks {
        Some(blocks) => blocks * BLOCK_SIZE,
        None => len,
    }
}
