//! Upload the Turtle export of the tracker.

use std::io::Write;

use anyhow::{Context, Result};
use seg_core::{Clock, ExportFormat, ExportSettings, Exporter};
use seg_doc::{DocumentStore, TrackerDocument};
use seg_upload::Uploader;

use crate::UploadConfig;

pub fn run<W: Write, S: DocumentStore>(
    writer: &mut W,
    doc: &TrackerDocument<S>,
    clock: &impl Clock,
    settings: &ExportSettings,
    config: &UploadConfig,
) -> Result<()> {
    let tracker = doc.load().context("failed to load tracker")?;
    let triples = Exporter::new(settings, clock).render(ExportFormat::Turtle, &tracker);

    // Printed first so the export survives a failed upload
    writer.write_all(triples.as_bytes())?;
    writer.flush()?;

    let token = config
        .token()
        .ok_or_else(|| anyhow::anyhow!("missing upload token (set SEG_UPLOAD__TOKEN or config.toml)"))?;
    let target = config.target();
    let url = target.url().context("invalid upload destination")?;

    let uploader = Uploader::new(token).context("failed to create upload client")?;
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    runtime
        .block_on(uploader.upload(&target, triples))
        .context("failed to upload export")?;

    writeln!(writer, "Uploaded to {url}")?;
    Ok(())
}
