//! CLI interface definitions for the `spacebrowser` application.
//!
//! This module defines command-line arguments using [`clap`] and exposes:
//!
//! - [`Args`]: the main struct parsed from CLI inputs
//! - [`OutputFormat`]: JSON document, terminal tree, or flattened CSV
//!
//! Flags override the environment profile defaults (see [`crate::profile`]).
//!
//! # Example
//!
//! ```bash
//! spacebrowser /data --min-size 0 --exclude /data/cache --format tree --depth 2
//! ```

use crate::policy::ScanPolicy;
use crate::profile::EnvironmentProfile;
use crate::thread_pool::WorkerStrategy;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for the `spacebrowser` disk usage scanner.
#[derive(Parser, Debug, Clone)]
#[command(name = "spacebrowser", author = "Sam Green", version, about)]
pub struct Args {
    /// Path to scan (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Additional paths to exclude (the path and everything beneath it)
    #[arg(long, value_name = "PATH", num_args = 1.., action = clap::ArgAction::Append)]
    pub exclude: Vec<PathBuf>,

    /// Do not apply the operating system's default exclusions
    #[arg(long, default_value_t = false)]
    pub no_default_excludes: bool,

    /// Skip files smaller than this many bytes (profile default: 1024)
    #[arg(long, value_name = "BYTES")]
    pub min_size: Option<u64>,

    /// Skip dotfiles and entries marked hidden
    #[arg(long, default_value_t = false)]
    pub skip_hidden: bool,

    /// Report logical file lengths instead of allocated disk space
    #[arg(long, default_value_t = false)]
    pub apparent_size: bool,

    /// Count hard-linked files only once
    #[arg(long, default_value_t = false)]
    pub dedup_hardlinks: bool,

    /// Limit the number of worker threads (overrides the strategy)
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Worker pool sizing strategy
    #[arg(long = "threads-strategy", value_enum, default_value_t = WorkerStrategy::Default)]
    pub threads_strategy: WorkerStrategy,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Limit the tree output to N levels below the root
    #[arg(long)]
    pub depth: Option<usize>,

    /// Write output to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print every skipped path, grouped by reason
    #[arg(long, default_value_t = false)]
    pub show_skipped: bool,

    /// Do not add the free-space entry when scanning a filesystem root
    #[arg(long, default_value_t = false)]
    pub no_free_space: bool,

    /// Open the scanned folder in the system file browser afterwards
    #[arg(long, default_value_t = false)]
    pub reveal: bool,

    /// Enable performance profiling and show timing summary
    #[arg(long, default_value_t = false)]
    pub profile: bool,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Resolves the scan policy: profile defaults, overridden by flags.
    pub fn scan_policy(&self, profile: &EnvironmentProfile) -> ScanPolicy {
        let mut profile = profile.clone();
        if self.no_default_excludes {
            profile.excluded_paths.clear();
        }
        profile.excluded_paths.extend(self.exclude.iter().cloned());
        if let Some(min_size) = self.min_size {
            profile.min_file_size_bytes = min_size;
        }
        profile.skip_hidden |= self.skip_hidden;
        profile.on_disk_size_enabled &= !self.apparent_size;

        profile.to_policy().with_dedup_hard_links(self.dedup_hardlinks)
    }

    /// Number of scan workers from `--threads` and `--threads-strategy`.
    pub fn worker_count(&self) -> usize {
        self.threads_strategy.worker_count(self.threads)
    }
}

/// How the scan result is written.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum OutputFormat {
    Json,
    Tree,
    Csv,
}

/// A single record of CSV output.
///
/// # Fields
/// * `entry_type` - "DIR", "FILE" or "FREE"
/// * `size_bytes` - Size in bytes
/// * `size_human` - Human-readable size (e.g., "1.2 MB")
/// * `depth` - Distance from the scan root
/// * `path` - Full path, or the free-space label
#[derive(Debug, serde::Serialize)]
pub struct CsvEntry {
    pub entry_type: String,
    pub size_bytes: u64,
    pub size_human: String,
    pub depth: usize,
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["spacebrowser"]);
        assert_eq!(args.path, PathBuf::from("."));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.threads_strategy, WorkerStrategy::Default);
        assert!(args.min_size.is_none());
        assert!(!args.no_free_space);
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "spacebrowser",
            "/data",
            "--exclude",
            "/data/a",
            "/data/b",
            "--min-size",
            "0",
            "--format",
            "tree",
            "--depth",
            "2",
            "--threads-strategy",
            "sequential",
        ]);
        assert_eq!(args.path, PathBuf::from("/data"));
        assert_eq!(args.exclude, vec![PathBuf::from("/data/a"), PathBuf::from("/data/b")]);
        assert_eq!(args.min_size, Some(0));
        assert_eq!(args.format, OutputFormat::Tree);
        assert_eq!(args.depth, Some(2));
        assert_eq!(args.threads_strategy, WorkerStrategy::Sequential);
        assert_eq!(args.worker_count(), 1);
    }

    #[test]
    fn test_flags_override_profile() {
        let mut profile = EnvironmentProfile::detect(std::path::Path::new("."));
        profile.excluded_paths = vec![PathBuf::from("/proc")];
        profile.case_sensitive = true;

        let args = Args::parse_from([
            "spacebrowser",
            "--exclude",
            "/data/cache",
            "--min-size",
            "0",
            "--skip-hidden",
            "--apparent-size",
            "--dedup-hardlinks",
        ]);
        let policy = args.scan_policy(&profile);

        assert_eq!(
            policy.excluded_paths(),
            &[PathBuf::from("/proc"), PathBuf::from("/data/cache")]
        );
        assert_eq!(policy.min_file_size_bytes, 0);
        assert!(policy.skip_hidden);
        assert!(!policy.on_disk_size_enabled);
        assert!(policy.dedup_hard_links);
        assert!(!policy.case_fold);

        let bare = Args::parse_from(["spacebrowser", "--no-default-excludes"]);
        let policy = bare.scan_policy(&profile);
        assert!(policy.excluded_paths().is_empty());
        assert_eq!(policy.min_file_size_bytes, profile.min_file_size_bytes);
        assert!(policy.on_disk_size_enabled);
    }
}
