//! Export command for printing the tracker as a table, CSV or Turtle.

use std::io::Write;

use anyhow::{Context, Result};
use seg_core::{Clock, ExportFormat, ExportSettings, Exporter};
use seg_doc::{DocumentStore, TrackerDocument};

pub fn run<W: Write, S: DocumentStore>(
    writer: &mut W,
    doc: &TrackerDocument<S>,
    clock: &impl Clock,
    format: ExportFormat,
    settings: &ExportSettings,
) -> Result<()> {
    let tracker = doc.load().context("failed to load tracker")?;
    tracing::debug!(%format, entries = tracker.entries.len(), "exporting tracker");

    let rendered = Exporter::new(settings, clock).render(format, &tracker);
    writer.write_all(rendered.as_bytes())?;
    Ok(())
}
