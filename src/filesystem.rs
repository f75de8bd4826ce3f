//! Filesystem access used by the tree builder.
//!
//! The builder only needs two things from the outside world: what kind of
//! thing the scan root is, and the direct children of a directory. Both go
//! through [`FileSystem`], which [`OsFileSystem`] implements with `walkdir`.

use crate::classify::{Entry, EntryStat, InodeKey};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// What the scan root turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    Directory,
    /// A symlink whose target is a directory. Scanned as an empty tree.
    SymlinkToDirectory,
    /// Missing, unreadable, or not a directory.
    Invalid,
}

/// Directory enumeration as seen by the tree builder.
pub trait FileSystem: Sync {
    type Entry: Entry + Send;

    fn inspect_root(&self, path: &Path) -> RootKind;

    /// Lists the direct children of `path`, in enumeration order.
    ///
    /// Any error, including one part-way through the listing, fails the
    /// whole directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<Self::Entry>>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    type Entry = OsEntry;

    fn inspect_root(&self, path: &Path) -> RootKind {
        match fs::symlink_metadata(path) {
            Ok(meta) if meta.file_type().is_symlink() => match fs::metadata(path) {
                Ok(target) if target.is_dir() => RootKind::SymlinkToDirectory,
                _ => RootKind::Invalid,
            },
            Ok(meta) if meta.is_dir() => RootKind::Directory,
            _ => RootKind::Invalid,
        }
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<OsEntry>> {
        WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .into_iter()
            .map(|entry| entry.map(OsEntry).map_err(io::Error::from))
            .collect()
    }
}

/// A directory entry from the real filesystem.
#[derive(Debug, Clone)]
pub struct OsEntry(DirEntry);

impl Entry for OsEntry {
    fn path(&self) -> &Path {
        self.0.path()
    }

    fn file_name(&self) -> OsString {
        self.0.file_name().to_os_string()
    }

    fn is_symlink(&self) -> io::Result<bool> {
        Ok(self.0.file_type().is_symlink())
    }

    fn is_dir(&self) -> io::Result<bool> {
        Ok(self.0.file_type().is_dir())
    }

    fn stat(&self) -> io::Result<EntryStat> {
        let meta = self.0.metadata().map_err(io::Error::from)?;
        Ok(stat_from_metadata(&meta))
    }

    #[cfg(windows)]
    fn is_hidden(&self) -> bool {
        use std::os::windows::fs::MetadataExt;
        const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
        const FILE_ATTRIBUTE_SYSTEM: u32 = 0x4;

        self.0
            .metadata()
            .map(|meta| meta.file_attributes() & (FILE_ATTRIBUTE_HIDDEN | FILE_ATTRIBUTE_SYSTEM) != 0)
            .unwrap_or(false)
    }
}

#[cfg(unix)]
fn stat_from_metadata(meta: &fs::Metadata) -> EntryStat {
    use std::os::unix::fs::MetadataExt;

    EntryStat {
        is_regular: meta.file_type().is_file(),
        len: meta.len(),
        blocks: Some(meta.blocks()),
        inode: Some(InodeKey {
            dev: meta.dev(),
            ino: meta.ino(),
        }),
    }
}

#[cfg(not(unix))]
fn stat_from_metadata(meta: &fs::Metadata) -> EntryStat {
    EntryStat {
        is_regular: meta.file_type().is_file(),
        len: meta.len(),
        blocks: None,
        inode: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_dir_lists_direct_children_only() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("sub").join("nested.txt"), "x").unwrap();
        fs::write(root.join("a.txt"), "hello").unwrap();

        let mut names: Vec<String> = OsFileSystem
            .read_dir(root)
            .unwrap()
            .iter()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();

        assert_eq!(names, vec!["a.txt", "sub"]);
    }

    #[test]
    fn test_read_dir_of_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        assert!(OsFileSystem.read_dir(&temp_dir.path().join("gone")).is_err());
    }

    #[test]
    fn test_entry_stat_reports_length() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), vec![0u8; 2000]).unwrap();

        let entries = OsFileSystem.read_dir(temp_dir.path()).unwrap();
        let stat = entries[0].stat().unwrap();
        assert!(stat.is_regular);
        assert_eq!(stat.len, 2000);
        assert!(!entries[0].is_dir().unwrap());
        assert!(!entries[0].is_symlink().unwrap());
    }

    #[test]
    fn test_inspect_root() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        assert_eq!(OsFileSystem.inspect_root(temp_dir.path()), RootKind::Directory);
        assert_eq!(OsFileSystem.inspect_root(&file), RootKind::Invalid);
        assert_eq!(
            OsFileSystem.inspect_root(&temp_dir.path().join("missing")),
            RootKind::Invalid
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_inspect_symlinked_root() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("target");
        fs::create_dir(&target).unwrap();
        let link = temp_dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert_eq!(OsFileSystem.inspect_root(&link), RootKind::SymlinkToDirectory);
    }
}
