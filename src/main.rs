//! Main entry point for the `spacebrowser` CLI application.
//!
//! `spacebrowser` scans a directory tree and reports where the space went:
//! a size-sorted tree with per-node size, type and depth, run-level file and
//! folder counts, and a free-space entry when a filesystem root is scanned.
//!
//! # Responsibilities
//! - Parses CLI arguments via [`clap`] using the [`Args`] struct
//! - Detects the environment profile and merges it with the flags
//! - Delegates traversal and aggregation to [`spacebrowser::scan`]
//! - Renders the document as JSON, a terminal tree, or CSV
//!
//! # Flags of Interest
//! - `--exclude PATH`: Skip a path and everything beneath it
//! - `--min-size BYTES`: Skip small files (default 1024)
//! - `--format json|tree|csv`: Output format
//! - `--reveal`: Open the scanned folder in the file browser

use anyhow::Result;
use clap::Parser;
use indicatif::ProgressBar;
use spacebrowser::Args;
use spacebrowser::cli::OutputFormat;
use spacebrowser::metrics::{PhaseTimer, ProfileData, print_profile_summary, rss_after_phase};
use spacebrowser::opener::open_in_file_browser;
use spacebrowser::output::{self, terminal};
use spacebrowser::profile::{EnvironmentProfile, SystemSpaceProbe};
use spacebrowser::progress::{SpinnerAwareStderr, start_spinner};
use spacebrowser::render::{Document, RenderOptions, render};
use spacebrowser::{ScanOptions, scan};
use std::io;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
/// Log lines hide `pb` while they are written.
fn init_logging(verbose: bool, pb: &ProgressBar) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(SpinnerAwareStderr::new(pb.clone()))
        .init();
}

/// Writes `document` in the requested format.
fn output_results(document: &Document, args: &Args) -> Result<()> {
    let mut writer = output::open_writer(args.output.as_deref())?;
    match args.format {
        OutputFormat::Json => output::render_json(document, &mut *writer)?,
        OutputFormat::Tree => output::render_terminal(document, args.depth, &mut *writer)?,
        OutputFormat::Csv => output::render_csv(document, &mut *writer)?,
    }
    if let Some(path) = &args.output {
        info!("Output saved to: {}", path.display());
    }
    Ok(())
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let pb = ProgressBar::new_spinner();
    init_logging(args.verbose, &pb);

    let mut profile_data = ProfileData::new();

    // Parse args → detect profile → scan → render → output
    let timer = PhaseTimer::new("Profile");
    let profile = EnvironmentProfile::detect(&args.path);
    profile.log();
    let policy = args.scan_policy(&profile);
    let options = ScanOptions {
        workers: args.worker_count(),
        ..ScanOptions::default()
    };
    info!(
        "Using {} strategy with {} worker(s)",
        args.threads_strategy.as_str(),
        options.workers
    );
    profile_data.add_phase(timer.finish());

    let timer = PhaseTimer::new("Walk");
    start_spinner(&pb)?;
    let result = scan(&args.path, &policy, &options);
    pb.finish_and_clear();
    profile_data.add_phase(timer.finish());

    let report = match result {
        Ok(report) => report,
        Err(err) => {
            warn!("{}", err);
            output_results(&Document::from_error(&err), &args)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let timer = PhaseTimer::new("Render");
    let render_options = RenderOptions {
        include_free_space: !args.no_free_space,
    };
    let document = render(&report.root, &report.summary, &SystemSpaceProbe, &render_options);
    output_results(&Document::Tree(document), &args)?;
    profile_data.add_phase(timer.finish());

    if args.show_skipped {
        terminal::render_skipped(&report.summary, &mut io::stderr())?;
    }

    if args.reveal {
        if let Err(err) = open_in_file_browser(report.root.full_path()) {
            warn!("Failed to open file browser: {:#}", err);
        }
    }

    if args.profile {
        profile_data.memory_peak = rss_after_phase();
        profile_data.add_counter("Files", report.summary.file_count);
        profile_data.add_counter("Folders", report.summary.directory_count);
        profile_data.add_counter("Skipped", report.summary.total_skipped() as u64);
        print_profile_summary(&profile_data);
    }

    Ok(ExitCode::SUCCESS)
}
