//! Best-effort "open in file browser".
//!
//! Tries a platform-specific list of opener commands in order. A command
//! that is not installed, or fails to start, is skipped in favor of the
//! next one. Files are revealed by opening their parent directory.

use anyhow::{Result, bail};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Opener programs for this platform, in preference order.
pub fn opener_programs() -> &'static [&'static str] {
    if cfg!(windows) {
        &["explorer"]
    } else if cfg!(target_os = "macos") {
        &["open"]
    } else {
        &["xdg-open", "nautilus", "dolphin", "thunar"]
    }
}

/// The directory that should be shown for `path`.
pub fn reveal_target(path: &Path) -> PathBuf {
    if path.is_file() {
        if let Some(parent) = path.parent() {
            return parent.to_path_buf();
        }
    }
    path.to_path_buf()
}

/// Opens `path` in the system file browser.
///
/// # Errors
/// Returns an error only if every candidate program failed to start. A
/// program that starts but exits non-zero still counts as handled.
pub fn open_in_file_browser(path: &Path) -> Result<()> {
    let target = reveal_target(path);
    for program in opener_programs() {
        match Command::new(program).arg(&target).status() {
            Ok(status) => {
                debug!("Opened {} with {} ({})", target.display(), program, status);
                return Ok(());
            }
            Err(err) => {
                debug!("Opener {} unavailable: {}", program, err);
            }
        }
    }
    warn!("No file browser could be started for {}", target.display());
    bail!(
        "no file manager found (tried {})",
        opener_programs().join(", ")
    )
}
