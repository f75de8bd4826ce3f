//! CSV output formatter for scan results.
//!
//! The tree is flattened depth-first, parents before children, so each
//! directory row is followed by its largest child first.

use crate::cli::CsvEntry;
use crate::render::{Document, RenderedNode};
use anyhow::Result;
use csv::Writer;
use humansize::{DECIMAL, format_size};
use std::io::Write;

/// Writes one CSV row per node of a tree document.
///
/// An error document is written as a single `ERROR` row.
pub fn render(document: &Document, writer: &mut dyn Write) -> Result<()> {
    let mut csv_writer = Writer::from_writer(writer);

    match document {
        Document::Tree(tree) => write_node(&mut csv_writer, &tree.root)?,
        Document::Error { error } => csv_writer.serialize(CsvEntry {
            entry_type: "ERROR".into(),
            size_bytes: 0,
            size_human: String::new(),
            depth: 0,
            path: error.clone(),
        })?,
    }

    csv_writer.flush()?;
    Ok(())
}

fn write_node<W: Write>(csv_writer: &mut Writer<W>, node: &RenderedNode) -> Result<()> {
    let entry_type = if node.is_free_space {
        "FREE"
    } else if node.is_folder {
        "DIR"
    } else {
        "FILE"
    };

    csv_writer.serialize(CsvEntry {
        entry_type: entry_type.into(),
        size_bytes: node.size,
        size_human: format_size(node.size, DECIMAL),
        depth: node.depth,
        path: node.full_path.clone().unwrap_or_else(|| node.name.clone()),
    })?;

    for child in node.children.iter().flatten() {
        write_node(csv_writer, child)?;
    }
    Ok(())
}
