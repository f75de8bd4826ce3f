//! Worker pool sizing for the parallel walk.
//!
//! Each scan builds its own rayon pool instead of configuring the global
//! one, so concurrent scans cannot resize each other's workers and the
//! number of directories open at once stays bounded by the pool size.
//!
//! # Strategies
//! - `Sequential`: a single worker, equivalent to a plain depth-first walk
//! - `Default`: one worker per logical CPU
//! - `NumCpusMinus1`: leaves one CPU free
//! - `IOHeavy`: four workers per CPU, capped at [`MAX_WORKERS`]

use clap::ValueEnum;
use rayon::{ThreadPool, ThreadPoolBuildError};

/// Upper bound on workers, to avoid file-descriptor exhaustion on very wide trees.
pub const MAX_WORKERS: usize = 32;

/// Thread pool configuration strategies.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum WorkerStrategy {
    Sequential,
    #[default]
    Default,
    NumCpusMinus1,
    IOHeavy,
}

impl WorkerStrategy {
    /// Returns a string representation of the strategy for display purposes.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerStrategy::Sequential => "Sequential",
            WorkerStrategy::Default => "Default",
            WorkerStrategy::NumCpusMinus1 => "NumCpusMinus1",
            WorkerStrategy::IOHeavy => "IOHeavy",
        }
    }

    /// Number of workers for this strategy. An explicit `requested` count
    /// overrides the strategy. The result is always in `1..=MAX_WORKERS`.
    pub fn worker_count(&self, requested: Option<usize>) -> usize {
        let cpus = num_cpus::get();
        let workers = match (requested, self) {
            (Some(n), _) => n,
            (None, WorkerStrategy::Sequential) => 1,
            (None, WorkerStrategy::Default) => cpus,
            (None, WorkerStrategy::NumCpusMinus1) => cpus.saturating_sub(1),
            (None, WorkerStrategy::IOHeavy) => cpus * 4,
        };
        workers.clamp(1, MAX_WORKERS)
    }
}

/// Builds a scan-local pool with `workers` threads.
pub fn build_pool(workers: usize) -> Result<ThreadPool, ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers.clamp(1, MAX_WORKERS))
        .thread_name(|i| format!("spacebrowser-worker-{i}"))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_strategy_as_str() {
        assert_eq!(WorkerStrategy::Sequential.as_str(), "Sequential");
        assert_eq!(WorkerStrategy::Default.as_str(), "Default");
        assert_eq!(WorkerStrategy::NumCpusMinus1.as_str(), "NumCpusMinus1");
        assert_eq!(WorkerStrategy::IOHeavy.as_str(), "IOHeavy");
    }

    #[test]
    fn test_worker_count_bounds() {
        assert_eq!(WorkerStrategy::Sequential.worker_count(None), 1);
        assert!(WorkerStrategy::NumCpusMinus1.worker_count(None) >= 1);
        assert!(WorkerStrategy::IOHeavy.worker_count(None) <= MAX_WORKERS);
        assert_eq!(WorkerStrategy::Default.worker_count(Some(0)), 1);
        assert_eq!(WorkerStrategy::Default.worker_count(Some(1_000)), MAX_WORKERS);
        assert_eq!(WorkerStrategy::Sequential.worker_count(Some(3)), 3);
    }

    #[test]
    fn test_build_pool() {
        let pool = build_pool(2).unwrap();
        assert_eq!(pool.current_num_threads(), 2);
    }
}
