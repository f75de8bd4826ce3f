//! Library crate for spacebrowser
//!
//! Computes disk-usage breakdowns for a directory tree: entries are
//! classified against a [`ScanPolicy`], sizes are aggregated bottom-up,
//! and every directory's children are sorted largest first.
//!
//! # Features
//!
//! - **Policy-driven classification**: symlinks, hidden files, excluded prefixes,
//!   special files and small files are skipped with a recorded reason
//! - **Failure tolerance**: unreadable directories become empty nodes
//! - **Parallel walk**: bounded, scan-local worker pools with deterministic output
//! - **Front-end document**: JSON tree with counts and a free-space entry for
//!   filesystem roots
//!
//! # Modules
//!
//! - [`policy`]: Scan configuration ([`ScanPolicy`])
//! - [`classify`]: Per-entry include/skip decisions
//! - [`filesystem`]: Directory enumeration seam and OS implementation
//! - [`data`]: Tree nodes ([`Node`])
//! - [`run`]: Run-scoped counters and skip bookkeeping
//! - [`scan`]: Tree building and the [`scan()`] entry point
//! - [`render`]: Output document and free-space synthesis
//! - [`profile`]: OS defaults and disk space queries
//! - [`output`]: JSON, terminal and CSV formatters
//! - [`opener`]: Open a path in the system file browser
//! - [`progress`]: Scan spinner and spinner-aware log output

pub mod classify;
pub mod cli;
pub mod data;
pub mod error;
pub mod filesystem;
pub mod metrics;
pub mod opener;
pub mod output;
pub mod policy;
pub mod profile;
pub mod progress;
pub mod render;
pub mod run;
pub mod scan;
pub mod thread_pool;
pub mod utils;

pub use cli::Args;
pub use data::{Node, NodeInfo};
pub use error::ScanError;
pub use policy::ScanPolicy;
pub use run::{CancelToken, RunSummary};
pub use scan::{ScanOptions, ScanReport, scan};
