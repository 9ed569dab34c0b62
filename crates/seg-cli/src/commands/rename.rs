//! Rename command.

use std::io::Write;

use anyhow::{Result, bail};
use seg_core::{EntryPath, rename_entry};
use seg_doc::{DocumentStore, TrackerDocument};

use super::util::{entry_name, load_for_mutation, persist};

pub fn run<W: Write, S: DocumentStore>(
    writer: &mut W,
    doc: &TrackerDocument<S>,
    path: &EntryPath,
    name: &str,
    force: bool,
) -> Result<()> {
    if name.is_empty() {
        bail!("name cannot be empty");
    }
    let mut tracker = load_for_mutation(doc, force)?;
    let old = entry_name(&tracker, path)?;
    rename_entry(&mut tracker, path, name);
    persist(writer, doc, &tracker)?;

    writeln!(writer, "Renamed {path}: {old} -> {name}")?;
    Ok(())
}
