//! JSON output formatter.

use crate::render::Document;
use anyhow::Result;
use std::io::Write;

/// Writes `document` as pretty-printed JSON followed by a newline.
pub fn render(document: &Document, writer: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, document)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
