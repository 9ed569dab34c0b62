//! Stop command for ending the running segment.

use std::io::Write;

use anyhow::{Result, bail};
use seg_core::{Clock, duration, end_running_entry, rename_entry};
use seg_doc::{DocumentStore, TrackerDocument};

use super::util::{display_duration, load_for_mutation, persist};

pub fn run<W: Write, S: DocumentStore>(
    writer: &mut W,
    doc: &TrackerDocument<S>,
    clock: &impl Clock,
    name: Option<&str>,
    force: bool,
) -> Result<()> {
    if name.is_some_and(str::is_empty) {
        bail!("name cannot be empty");
    }
    let mut tracker = load_for_mutation(doc, force)?;
    let Some(path) = end_running_entry(&mut tracker, clock) else {
        writeln!(writer, "Nothing is running.")?;
        return Ok(());
    };
    if let Some(name) = name {
        rename_entry(&mut tracker, &path, name);
    }
    persist(writer, doc, &tracker)?;

    if let Some(entry) = tracker.get(&path) {
        writeln!(
            writer,
            "Stopped {path}: {} after {}",
            entry.name,
            display_duration(duration(entry, clock))
        )?;
    }
    Ok(())
}
