//! Terminal output formatter for scan results.
//!
//! Prints the tree indented by depth with `[DIR]`, `[FILE]` and `[FREE]`
//! prefixes and human-readable sizes.

use crate::render::{Document, RenderedNode};
use crate::run::RunSummary;
use anyhow::Result;
use humansize::{DECIMAL, format_size};
use std::io::Write;

/// Renders a document as an indented tree.
///
/// # Arguments
/// * `document` - The rendered scan result
/// * `max_depth` - Levels below the root to print; `None` prints everything
/// * `writer` - Destination
pub fn render(document: &Document, max_depth: Option<usize>, writer: &mut dyn Write) -> Result<()> {
    match document {
        Document::Tree(tree) => {
            write_node(writer, &tree.root, max_depth)?;
            writeln!(
                writer,
                "\n{} files, {} folders, {} total",
                tree.file_count,
                tree.folder_count,
                format_size(tree.root.size, DECIMAL)
            )?;
        }
        Document::Error { error } => writeln!(writer, "Error: {}", error)?,
    }
    writer.flush()?;
    Ok(())
}

fn write_node(writer: &mut dyn Write, node: &RenderedNode, max_depth: Option<usize>) -> Result<()> {
    let prefix = if node.is_free_space {
        "[FREE]"
    } else if node.is_folder {
        "[DIR] "
    } else {
        "[FILE]"
    };
    writeln!(
        writer,
        "{:indent$}{} {:<12} {}",
        "",
        prefix,
        format_size(node.size, DECIMAL),
        node.name,
        indent = node.depth * 2
    )?;

    if max_depth.is_some_and(|limit| node.depth >= limit) {
        return Ok(());
    }
    for child in node.children.iter().flatten() {
        write_node(writer, child, max_depth)?;
    }
    Ok(())
}

/// Prints every skipped path, grouped by reason.
pub fn render_skipped(summary: &RunSummary, writer: &mut dyn Write) -> Result<()> {
    for (reason, paths) in &summary.skipped {
        writeln!(writer, "Skipped {} entries for {}", paths.len(), reason)?;
        for path in paths {
            writeln!(writer, "   - {}", path.display())?;
        }
    }
    Ok(())
}
