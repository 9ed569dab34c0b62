//! Edit command for correcting a segment's start and end times.

use std::io::Write;

use anyhow::{Result, bail};
use seg_core::{Clock, EntryPath, ExportSettings, Exporter, set_end_time, set_start_time};
use seg_doc::{DocumentStore, TrackerDocument};

use super::util::{load_for_mutation, parse_timestamp, persist};

pub fn run<W: Write, S: DocumentStore>(
    writer: &mut W,
    doc: &TrackerDocument<S>,
    clock: &impl Clock,
    path: &EntryPath,
    start: Option<&str>,
    end: Option<&str>,
    force: bool,
) -> Result<()> {
    if start.is_none() && end.is_none() {
        bail!("nothing to change: pass --start and/or --end");
    }
    let start = start.map(|s| parse_timestamp(s, clock)).transpose()?;
    let end = end.map(|s| parse_timestamp(s, clock)).transpose()?;

    let mut tracker = load_for_mutation(doc, force)?;
    match tracker.get(path) {
        None => bail!("no entry at {path}"),
        Some(entry) if entry.is_branch() => {
            bail!("{path} has parts; edit the parts' times instead")
        }
        Some(_) => {}
    }
    if let Some(secs) = start {
        set_start_time(&mut tracker, path, secs);
    }
    if let Some(secs) = end {
        set_end_time(&mut tracker, path, secs);
    }
    persist(writer, doc, &tracker)?;

    let settings = ExportSettings::default();
    let exporter = Exporter::new(&settings, clock);
    let Some(entry) = tracker.get(path) else {
        return Ok(());
    };
    let show = |secs: Option<i64>| {
        secs.map_or_else(|| "running".to_string(), |s| exporter.format_timestamp(s))
    };
    writeln!(
        writer,
        "{path}: {} {} - {}",
        entry.name,
        show(entry.start_time),
        show(entry.end_time)
    )?;
    Ok(())
}
