//! Environment profile: OS-appropriate scan defaults and disk facts.
//!
//! The scanner itself performs no OS detection. This module gathers the
//! platform facts once (default exclusions, filesystem case sensitivity,
//! worker heuristic, disk totals for the mount holding the scan root) and
//! turns them into a [`ScanPolicy`].

use crate::policy::ScanPolicy;
use crate::thread_pool::WorkerStrategy;
use crate::utils::normalize_path;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use sysinfo::Disks;
use tracing::info;

/// Default minimum file size, in bytes.
pub const DEFAULT_MIN_FILE_SIZE: u64 = 1024;

/// Capacity of the filesystem holding a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskSpace {
    pub total: u64,
    pub free: u64,
}

/// Source of free/total byte counts for the filesystem holding a path.
pub trait SpaceProbe {
    fn disk_space(&self, path: &Path) -> Option<DiskSpace>;
}

/// Queries the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSpaceProbe;

impl SpaceProbe for SystemSpaceProbe {
    #[cfg(unix)]
    fn disk_space(&self, path: &Path) -> Option<DiskSpace> {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        let c_path = CString::new(path.as_os_str().as_bytes()).ok()?;
        let mut buf = std::mem::MaybeUninit::<libc::statvfs>::uninit();
        let result = unsafe { libc::statvfs(c_path.as_ptr(), buf.as_mut_ptr()) };
        if result != 0 {
            return None;
        }

        let buf = unsafe { buf.assume_init() };
        let fragment = buf.f_frsize as u64;
        Some(DiskSpace {
            total: buf.f_blocks as u64 * fragment,
            free: buf.f_bavail as u64 * fragment,
        })
    }

    #[cfg(not(unix))]
    fn disk_space(&self, path: &Path) -> Option<DiskSpace> {
        let disks = Disks::new_with_refreshed_list();
        disks
            .iter()
            .filter(|disk| path.starts_with(disk.mount_point()))
            .max_by_key(|disk| disk.mount_point().as_os_str().len())
            .map(|disk| DiskSpace {
                total: disk.total_space(),
                free: disk.available_space(),
            })
    }
}

/// Platform facts and the scan defaults derived from them.
#[derive(Debug, Clone)]
pub struct EnvironmentProfile {
    pub os: &'static str,
    pub arch: &'static str,
    pub case_sensitive: bool,
    pub mount_root: PathBuf,
    pub disk: Option<DiskSpace>,
    pub excluded_paths: Vec<PathBuf>,
    pub follow_symlinks: bool,
    pub skip_hidden: bool,
    pub min_file_size_bytes: u64,
    pub on_disk_size_enabled: bool,
    pub max_workers: usize,
}

impl EnvironmentProfile {
    /// Gathers the profile for a scan of `selected`.
    pub fn detect(selected: &Path) -> Self {
        let selected = normalize_path(selected).unwrap_or_else(|_| selected.to_path_buf());
        let mount_root = mount_root(&selected);
        let case_sensitive = probe_case_sensitive(&std::env::temp_dir())
            .unwrap_or(!cfg!(any(windows, target_os = "macos")));

        Self {
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            case_sensitive,
            disk: SystemSpaceProbe.disk_space(&mount_root),
            mount_root,
            excluded_paths: default_excluded_paths(),
            follow_symlinks: false,
            skip_hidden: false,
            min_file_size_bytes: DEFAULT_MIN_FILE_SIZE,
            on_disk_size_enabled: true,
            max_workers: WorkerStrategy::IOHeavy.worker_count(None),
        }
    }

    /// Builds the scan policy carried by this profile.
    pub fn to_policy(&self) -> ScanPolicy {
        let mut policy = ScanPolicy::new()
            .with_excluded_paths(&self.excluded_paths)
            .with_skip_hidden(self.skip_hidden)
            .with_min_file_size(self.min_file_size_bytes)
            .with_on_disk_size(self.on_disk_size_enabled)
            .with_case_fold(!self.case_sensitive);
        policy.follow_symlinks = self.follow_symlinks;
        policy
    }

    /// Logs the profile at info level.
    pub fn log(&self) {
        info!("Platform: {} ({})", self.os, self.arch);
        info!("Case-sensitive FS: {}", self.case_sensitive);
        info!("Mount root: {}", self.mount_root.display());
        if let Some(disk) = self.disk {
            info!(
                "Disk total: {} bytes, used: {} bytes, free: {} bytes",
                disk.total,
                disk.total.saturating_sub(disk.free),
                disk.free
            );
        }
        info!(
            "Follow symlinks: {}, skip hidden: {}, min file size: {} bytes",
            self.follow_symlinks, self.skip_hidden, self.min_file_size_bytes
        );
        info!("Excluded paths: {}", self.excluded_paths.len());
        for path in &self.excluded_paths {
            info!("   - {}", path.display());
        }
        info!("Max workers: {}", self.max_workers);
    }
}

/// Paths that are virtual, volatile, or otherwise not worth scanning on
/// this operating system.
pub fn default_excluded_paths() -> Vec<PathBuf> {
    if cfg!(target_os = "linux") {
        [
            "/proc",
            "/sys",
            "/dev",
            "/run",
            "/var/lib/docker",
            "/var/log/lastlog",
            "/snap",
        ]
        .iter()
        .map(PathBuf::from)
        .collect()
    } else if cfg!(target_os = "macos") {
        [
            "/System",
            "/private/var/vm",
            "/Volumes/MobileBackups",
            "/Library/Application Support/MobileSync/Backup",
        ]
        .iter()
        .map(PathBuf::from)
        .collect()
    } else if cfg!(windows) {
        let windir = PathBuf::from(std::env::var("WINDIR").unwrap_or_else(|_| r"C:\Windows".to_string()));
        vec![
            PathBuf::from(r"C:\$Recycle.Bin"),
            PathBuf::from(r"C:\System Volume Information"),
            windir.join("WinSxS"),
            windir.join("Temp"),
        ]
    } else {
        Vec::new()
    }
}

/// Tests whether the filesystem holding `dir` distinguishes letter case by
/// creating a mixed-case file and looking it up lower-cased.
pub fn probe_case_sensitive(dir: &Path) -> io::Result<bool> {
    let name = format!("CsTest-{}.tmp", std::process::id());
    let probe = dir.join(&name);
    fs::write(&probe, b"")?;
    let lower_exists = dir.join(name.to_lowercase()).exists();
    fs::remove_file(&probe)?;
    Ok(!lower_exists)
}

/// The mount point holding `path`: the longest known mount point that is a
/// prefix of it, or the path's own root.
pub fn mount_root(path: &Path) -> PathBuf {
    let disks = Disks::new_with_refreshed_list();
    disks
        .iter()
        .map(|disk| disk.mount_point())
        .filter(|mount| mount.is_absolute() && path.starts_with(mount))
        .max_by_key(|mount| mount.as_os_str().len())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| path.ancestors().last().unwrap_or(path).to_path_buf())
}
