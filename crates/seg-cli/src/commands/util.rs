//! Shared utilities for CLI commands.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use seg_core::{Clock, EntryPath, Tracker, encode, format_duration};
use seg_doc::{DocError, DocumentStore, TrackerDocument};

/// Input pattern for timestamps given on the command line (`MM/DD/YYYY HH:mm`).
pub const INPUT_TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M";

/// Parse a local "MM/DD/YYYY HH:mm" timestamp into epoch seconds.
pub fn parse_timestamp(s: &str, clock: &impl Clock) -> Result<i64> {
    let local = NaiveDateTime::parse_from_str(s.trim(), INPUT_TIMESTAMP_FORMAT).with_context(
        || format!("Invalid timestamp: {s}. Use MM/DD/YYYY HH:mm (e.g., 01/27/2025 09:30)"),
    )?;
    clock
        .timestamp_from_local(local)
        .with_context(|| format!("{s} does not exist in the local timezone"))
}

/// Loads the tracker for a command that will save it back.
///
/// A corrupt block is only replaced (by an empty tracker) when `force` is set.
pub fn load_for_mutation<S: DocumentStore>(
    doc: &TrackerDocument<S>,
    force: bool,
) -> Result<Tracker> {
    match doc.load_strict() {
        Ok(tracker) => Ok(tracker),
        Err(DocError::Corrupt { index, source }) if force => {
            tracing::warn!(index, error = %source, "replacing corrupt tracker block");
            Ok(Tracker::default())
        }
        Err(err @ DocError::Corrupt { .. }) => Err(anyhow::Error::new(err)
            .context("refusing to modify an unreadable tracker (rerun with --force to replace it)")),
        Err(err) => Err(anyhow::Error::new(err).context("failed to load tracker")),
    }
}

/// Saves the tracker, printing its JSON to `writer` if the save fails.
pub fn persist<W: Write, S: DocumentStore>(
    writer: &mut W,
    doc: &TrackerDocument<S>,
    tracker: &Tracker,
) -> Result<()> {
    let Err(err) = doc.save(tracker) else {
        return Ok(());
    };
    if let Ok(json) = encode(tracker) {
        writeln!(writer, "Unsaved tracker:")?;
        writeln!(writer, "{json}")?;
    }
    Err(anyhow::Error::new(err).context("failed to save tracker"))
}

/// Fails unless `path` addresses an entry, returning its name.
pub fn entry_name(tracker: &Tracker, path: &EntryPath) -> Result<String> {
    match tracker.get(path) {
        Some(entry) => Ok(entry.name.clone()),
        None => bail!("no entry at {path}"),
    }
}

/// A duration for display; anything under a minute shows as "0m".
pub fn display_duration(ms: i64) -> String {
    let formatted = format_duration(ms);
    let trimmed = formatted.trim_end();
    if trimmed.is_empty() {
        "0m".to_string()
    } else {
        trimmed.to_string()
    }
}
