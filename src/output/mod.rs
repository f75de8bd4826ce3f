//! Modular output system for the `spacebrowser` application.
//!
//! Every formatter takes an already-rendered [`crate::render::Document`] and
//! writes it to any [`std::io::Write`]. Formatters contain no scan logic.
//!
//! # Available Formatters
//!
//! - **JSON**: The tree document consumed by graphical front ends
//! - **Terminal**: Indented tree with human-readable sizes
//! - **CSV**: One row per node for data analysis

pub mod csv;
pub mod json;
pub mod terminal;

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// CSV output renderer function.
///
/// See [`csv::render`] for full documentation.
pub use csv::render as render_csv;

/// JSON output renderer function.
///
/// See [`json::render`] for full documentation.
pub use json::render as render_json;

/// Terminal output renderer function.
///
/// See [`terminal::render`] for full documentation.
pub use terminal::render as render_terminal;

/// Opens `output` for writing, or stdout when no file is given.
pub fn open_writer(output: Option<&Path>) -> Result<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}
