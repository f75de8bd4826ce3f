//! Entry classification.
//!
//! [`classify`] decides, for one directory entry, whether it becomes a file
//! node, a directory to recurse into, or a skip with a specific
//! [`SkipReason`]. Checks run in a fixed order and the first match wins:
//!
//! 1. symlink (or a failed link probe)
//! 2. hidden, when the policy skips hidden entries
//! 3. excluded path prefix
//! 4. file-vs-directory resolution
//! 5. for files: stat, regular-file check, minimum size
//!
//! Entries are accessed through the [`Entry`] trait so the same decision
//! logic runs against the real filesystem and against in-memory fixtures.

use crate::policy::ScanPolicy;
use crate::utils::on_disk_size;
use serde::Serialize;
use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::Path;

/// Identity of a file on disk, used to recognize hard links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InodeKey {
    pub dev: u64,
    pub ino: u64,
}

/// The subset of file metadata the classifier needs.
///
/// # Fields
/// * `is_regular` - `false` for devices, sockets, FIFOs and other special files
/// * `len` - Logical length in bytes
/// * `blocks` - Allocated 512-byte blocks, when the platform reports them
/// * `inode` - Device/inode pair, when the platform reports them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryStat {
    pub is_regular: bool,
    pub len: u64,
    pub blocks: Option<u64>,
    pub inode: Option<InodeKey>,
}

/// One item produced by enumerating a directory.
///
/// None of the probes follow symlinks.
pub trait Entry {
    /// Absolute, normalized path of the entry.
    fn path(&self) -> &Path;

    fn file_name(&self) -> OsString;

    fn is_symlink(&self) -> io::Result<bool>;

    fn is_dir(&self) -> io::Result<bool>;

    fn stat(&self) -> io::Result<EntryStat>;

    /// Dotfile check by default; platforms with a hidden attribute override this.
    fn is_hidden(&self) -> bool {
        self.file_name().to_string_lossy().starts_with('.')
    }
}

/// Why an entry was left out of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    Symlink,
    SymlinkCheckError,
    Hidden,
    Excluded,
    TypeUnknown,
    StatError,
    NonRegular,
    MinSize,
    HardLink,
}

impl SkipReason {
    /// Returns the kebab-case label used in logs and documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Symlink => "symlink",
            SkipReason::SymlinkCheckError => "symlink-check-error",
            SkipReason::Hidden => "hidden",
            SkipReason::Excluded => "excluded",
            SkipReason::TypeUnknown => "type-unknown",
            SkipReason::StatError => "stat-error",
            SkipReason::NonRegular => "non-regular",
            SkipReason::MinSize => "min-size",
            SkipReason::HardLink => "hard-link",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Recurse into this directory; its size comes from its children.
    Directory,
    /// Include as a file leaf.
    File {
        size_bytes: u64,
        inode: Option<InodeKey>,
    },
    Skip(SkipReason),
}

impl Classification {
    pub fn is_skip(&self) -> bool {
        matches!(self, Classification::Skip(_))
    }
}

/// Classifies `entry` under `policy`.
///
/// Reads metadata for this one entry only and has no other side effects.
/// Hard-link de-duplication needs run state and is applied by the caller.
pub fn classify<E: Entry + ?Sized>(entry: &E, policy: &ScanPolicy) -> Classification {
    // Symlinks are never traversed, whatever `follow_symlinks` says.
    match entry.is_symlink() {
        Ok(true) => return Classification::Skip(SkipReason::Symlink),
        Ok(false) => {}
        Err(_) => return Classification::Skip(SkipReason::SymlinkCheckError),
    }

    if policy.skip_hidden && entry.is_hidden() {
        return Classification::Skip(SkipReason::Hidden);
    }

    if policy.is_excluded(entry.path()) {
        return Classification::Skip(SkipReason::Excluded);
    }

    match entry.is_dir() {
        Ok(true) => return Classification::Directory,
        Ok(false) => {}
        Err(_) => return Classification::Skip(SkipReason::TypeUnknown),
    }

    let stat = match entry.stat() {
        Ok(stat) => stat,
        Err(_) => return Classification::Skip(SkipReason::StatError),
    };

    if !stat.is_regular {
        return Classification::Skip(SkipReason::NonRegular);
    }

    if policy.min_file_size_bytes > 0 && stat.len < policy.min_file_size_bytes {
        return Classification::Skip(SkipReason::MinSize);
    }

    let size_bytes = if policy.on_disk_size_enabled {
        on_disk_size(stat.blocks, stat.len)
    } else {
        stat.len
    };

    Classification::File {
        size_bytes,
        inode: stat.inode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Scripted entry: every probe result is set up front.
    struct FakeEntry {
        path: PathBuf,
        symlink: io::Result<bool>,
        dir: io::Result<bool>,
        stat: io::Result<EntryStat>,
    }

    fn err() -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, "denied")
    }

    fn regular(len: u64) -> EntryStat {
        EntryStat {
            is_regular: true,
            len,
            blocks: Some(8),
            inode: Some(InodeKey { dev: 1, ino: 42 }),
        }
    }

    impl FakeEntry {
        fn file(path: &str, len: u64) -> Self {
            Self {
                path: PathBuf::from(path),
                symlink: Ok(false),
                dir: Ok(false),
                stat: Ok(regular(len)),
            }
        }

        fn dir(path: &str) -> Self {
            Self {
                path: PathBuf::from(path),
                symlink: Ok(false),
                dir: Ok(true),
                stat: Ok(regular(0)),
            }
        }
    }

    impl Entry for FakeEntry {
        fn path(&self) -> &Path {
            &self.path
        }

        fn file_name(&self) -> OsString {
            self.path.file_name().unwrap_or_default().to_os_string()
        }

        fn is_symlink(&self) -> io::Result<bool> {
            self.symlink.as_ref().map(|v| *v).map_err(|_| err())
        }

        fn is_dir(&self) -> io::Result<bool> {
            self.dir.as_ref().map(|v| *v).map_err(|_| err())
        }

        fn stat(&self) -> io::Result<EntryStat> {
            self.stat.as_ref().map(|v| *v).map_err(|_| err())
        }
    }

    #[test]
    fn test_symlink_wins_over_exclusion() {
        let policy = ScanPolicy::new().with_excluded_paths(["/data/link"]);
        let mut entry = FakeEntry::file("/data/link", 10);
        entry.symlink = Ok(true);

        assert_eq!(
            classify(&entry, &policy),
            Classification::Skip(SkipReason::Symlink)
        );
    }

    #[test]
    fn test_symlinks_skipped_even_when_following_is_configured() {
        let mut policy = ScanPolicy::new();
        policy.follow_symlinks = true;
        let mut entry = FakeEntry::dir("/data/link");
        entry.symlink = Ok(true);

        assert_eq!(
            classify(&entry, &policy),
            Classification::Skip(SkipReason::Symlink)
        );
    }

    #[test]
    fn test_failed_link_probe() {
        let mut entry = FakeEntry::file("/data/a", 10);
        entry.symlink = Err(err());
        assert_eq!(
            classify(&entry, &ScanPolicy::new()),
            Classification::Skip(SkipReason::SymlinkCheckError)
        );
    }

    #[test]
    fn test_hidden_only_when_policy_says_so() {
        let entry = FakeEntry::file("/data/.cache", 10);
        assert!(!classify(&entry, &ScanPolicy::new()).is_skip());

        let policy = ScanPolicy::new()
            .with_skip_hidden(true)
            .with_excluded_paths(["/data/.cache"]);
        assert_eq!(
            classify(&entry, &policy),
            Classification::Skip(SkipReason::Hidden)
        );
    }

    #[test]
    fn test_excluded_beats_type_and_stat_failures() {
        let policy = ScanPolicy::new().with_excluded_paths(["/proc"]);
        let mut entry = FakeEntry::file("/proc/self", 10);
        entry.dir = Err(err());
        entry.stat = Err(err());

        assert_eq!(
            classify(&entry, &policy),
            Classification::Skip(SkipReason::Excluded)
        );
    }

    #[test]
    fn test_type_unknown() {
        let mut entry = FakeEntry::file("/data/a", 10);
        entry.dir = Err(err());
        assert_eq!(
            classify(&entry, &ScanPolicy::new()),
            Classification::Skip(SkipReason::TypeUnknown)
        );
    }

    #[test]
    fn test_stat_error_and_non_regular() {
        let mut entry = FakeEntry::file("/data/a", 10);
        entry.stat = Err(err());
        assert_eq!(
            classify(&entry, &ScanPolicy::new()),
            Classification::Skip(SkipReason::StatError)
        );

        let mut fifo = FakeEntry::file("/data/fifo", 0);
        fifo.stat = Ok(EntryStat {
            is_regular: false,
            len: 0,
            blocks: None,
            inode: None,
        });
        assert_eq!(
            classify(&fifo, &ScanPolicy::new()),
            Classification::Skip(SkipReason::NonRegular)
        );
    }

    #[test]
    fn test_min_size_boundary() {
        let policy = ScanPolicy::new().with_min_file_size(1024);

        let exact = FakeEntry::file("/data/exact", 1024);
        assert_eq!(
            classify(&exact, &policy),
            Classification::File {
                size_bytes: 1024,
                inode: Some(InodeKey { dev: 1, ino: 42 })
            }
        );

        let smaller = FakeEntry::file("/data/smaller", 1023);
        assert_eq!(
            classify(&smaller, &policy),
            Classification::Skip(SkipReason::MinSize)
        );
    }

    #[test]
    fn test_directories_ignore_min_size() {
        let policy = ScanPolicy::new().with_min_file_size(1024);
        let mut entry = FakeEntry::dir("/data/empty");
        entry.stat = Err(err());
        assert_eq!(classify(&entry, &policy), Classification::Directory);
    }

    #[test]
    fn test_size_mode() {
        let entry = FakeEntry::file("/data/a", 100);

        let logical = classify(&entry, &ScanPolicy::new());
        assert!(matches!(logical, Classification::File { size_bytes: 100, .. }));

        let on_disk = classify(&entry, &ScanPolicy::new().with_on_disk_size(true));
        assert!(matches!(on_disk, Classification::File { size_bytes: 4096, .. }));
    }

    #[test]
    fn test_on_disk_falls_back_to_len_without_blocks() {
        let mut entry = FakeEntry::file("/data/a", 100);
        entry.stat = Ok(EntryStat {
            is_regular: true,
            len: 100,
            blocks: None,
            inode: None,
        });
        let outcome = classify(&entry, &ScanPolicy::new().with_on_disk_size(true));
        assert!(matches!(outcome, Classification::File { size_bytes: 100, .. }));
    }

    #[test]
    fn test_skip_reason_labels() {
        assert_eq!(SkipReason::SymlinkCheckError.as_str(), "symlink-check-error");
        assert_eq!(SkipReason::MinSize.to_string(), "min-size");
        assert_eq!(
            serde_json::to_string(&SkipReason::NonRegular).unwrap(),
            "\"non-regular\""
        );
    }
}
