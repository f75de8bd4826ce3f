//! Phase timing for `--profile`.
//!
//! This module provides:
//! - [`PhaseTimer`] - A wrapper around `Instant` for timing different phases
//! - [`rss_after_phase`] - Optional memory usage tracking using `sysinfo`
//! - [`ProfileData`] - Collected phase timings and counters
//! - [`print_profile_summary`] - Summary written to stderr
//!
//! # Usage
//!
//! ```rust
//! use spacebrowser::metrics::{PhaseTimer, ProfileData, rss_after_phase};
//!
//! let mut profile = ProfileData::new();
//! let timer = PhaseTimer::new("Walk");
//!
//! // ... do work ...
//!
//! profile.add_phase(timer.finish());
//! profile.memory_peak = rss_after_phase();
//! ```

use serde::Serialize;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use sysinfo::{Pid, System};

/// A timer for one named phase.
#[derive(Debug, Clone)]
pub struct PhaseTimer {
    pub name: String,
    pub start: Instant,
}

impl PhaseTimer {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }

    /// Stops the timer and returns the phase result.
    pub fn finish(self) -> PhaseResult {
        PhaseResult {
            name: self.name,
            duration: self.start.elapsed(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// The result of a completed phase timing operation.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseResult {
    pub name: String,
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Duration,
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Timings and counters for one CLI invocation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileData {
    pub phases: Vec<PhaseResult>,
    /// Resident memory after the last phase, in bytes.
    pub memory_peak: Option<u64>,
    pub counters: BTreeMap<String, u64>,
}

impl ProfileData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_phase(&mut self, phase: PhaseResult) {
        self.phases.push(phase);
    }

    pub fn add_counter(&mut self, key: &str, value: u64) {
        self.counters.insert(key.to_string(), value);
    }

    /// Sum of all phase durations.
    pub fn total_duration(&self) -> Duration {
        self.phases.iter().map(|p| p.duration).sum()
    }
}

/// Resident set size of the current process, or `None` where `sysinfo`
/// cannot report it.
pub fn rss_after_phase() -> Option<u64> {
    let pid = Pid::from_u32(std::process::id());
    let mut system = System::new();
    if !system.refresh_process(pid) {
        return None;
    }
    system.process(pid).map(|process| process.memory())
}

/// Prints a formatted profile summary to stderr.
///
/// # Example Output
/// ```text
/// Scan phase timings
///   Walk                150 ms
///   Render               12 ms
/// Memory peak:      42.0 MB
/// ```
pub fn print_profile_summary(profile: &ProfileData) {
    eprintln!("\nScan phase timings");

    for phase in &profile.phases {
        eprintln!("  {:<15} {:>7} ms", phase.name, phase.duration.as_millis());
    }
    eprintln!("  {:<15} {:>7} ms", "Total", profile.total_duration().as_millis());

    if let Some(memory_peak) = profile.memory_peak {
        let memory_mb = memory_peak as f64 / (1024.0 * 1024.0);
        eprintln!("Memory peak:      {:.1} MB", memory_mb);
    }

    for (key, value) in &profile.counters {
        eprintln!("  {:<15} {}", key, value);
    }

    eprintln!();
}
