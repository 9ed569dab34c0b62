//! Next command: stop the running segment and start another.

use std::io::Write;

use anyhow::{Result, bail};
use seg_core::{Clock, end_running_entry, rename_entry, start_new_entry};
use seg_doc::{DocumentStore, TrackerDocument};

use super::util::{load_for_mutation, persist};

pub fn run<W: Write, S: DocumentStore>(
    writer: &mut W,
    doc: &TrackerDocument<S>,
    clock: &impl Clock,
    finished_name: Option<&str>,
    name: Option<&str>,
    force: bool,
) -> Result<()> {
    if finished_name.is_some_and(str::is_empty) {
        bail!("finished name cannot be empty");
    }
    let mut tracker = load_for_mutation(doc, force)?;

    if let Some(stopped) = end_running_entry(&mut tracker, clock) {
        if let Some(finished_name) = finished_name {
            rename_entry(&mut tracker, &stopped, finished_name);
        }
        if let Some(entry) = tracker.get(&stopped) {
            writeln!(writer, "Stopped {stopped}: {}", entry.name)?;
        }
    }
    let started = start_new_entry(&mut tracker, name.unwrap_or_default(), clock);
    persist(writer, doc, &tracker)?;

    if let Some(entry) = tracker.get(&started) {
        writeln!(writer, "Started {started}: {}", entry.name)?;
    }
    Ok(())
}
