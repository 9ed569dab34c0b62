//! Init command for adding a tracker block to a document.

use std::io::Write;

use anyhow::{Context, Result};
use seg_doc::{DocumentStore, TrackerDocument};

pub fn run<W: Write, S: DocumentStore>(writer: &mut W, doc: &TrackerDocument<S>) -> Result<()> {
    let added = doc.init().context("failed to add tracker block")?;
    if added {
        writeln!(writer, "Added tracker block.")?;
    } else {
        writeln!(writer, "Document already has a tracker block.")?;
    }
    Ok(())
}
