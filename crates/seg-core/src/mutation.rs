//! Invariant-preserving changes to the entry tree.
//!
//! These are low-level primitives. Composite user actions ("stop the current
//! segment and start the next one") are sequenced by the caller, and every
//! intermediate state they pass through is a valid tree.

use crate::clock::Clock;
use crate::entry::{Entry, Tracker, running_path};
use crate::types::EntryPath;

/// Appends a running top-level entry and returns its path.
///
/// An empty `name` becomes `Segment {n}`, numbered after the existing
/// top-level entries. Does not stop an entry that is already running.
pub fn start_new_entry(tracker: &mut Tracker, name: &str, clock: &impl Clock) -> EntryPath {
    let name = if name.is_empty() {
        format!("Segment {}", tracker.entries.len() + 1)
    } else {
        name.to_string()
    };
    tracker.entries.push(Entry::running(name, clock.now()));

    let path = EntryPath::top_level(tracker.entries.len() - 1);
    tracing::debug!(%path, "started entry");
    path
}

/// Stops the running entry, returning its path.
///
/// A no-op returning `None` when nothing is running.
pub fn end_running_entry(tracker: &mut Tracker, clock: &impl Clock) -> Option<EntryPath> {
    let path = running_path(&tracker.entries)?;
    let entry = tracker.get_mut(&path)?;
    entry.end_time = Some(clock.now());
    tracing::debug!(%path, "stopped entry");
    Some(path)
}

/// Continues `entry` as a new running sub-entry, returning the child index.
///
/// A leaf is first turned into a branch: its own timing moves into a first
/// child named `Part 1`. An empty `name` becomes `Part {n}`.
pub fn start_sub_entry(entry: &mut Entry, name: &str, clock: &impl Clock) -> usize {
    if entry.is_leaf() {
        let first = Entry {
            name: "Part 1".to_string(),
            start_time: entry.start_time.take(),
            end_time: entry.end_time.take(),
            children: Vec::new(),
        };
        entry.children.push(first);
    }

    let name = if name.is_empty() {
        format!("Part {}", entry.children.len() + 1)
    } else {
        name.to_string()
    };
    entry.children.push(Entry::running(name, clock.now()));
    entry.children.len() - 1
}

/// Removes the entry at `path`.
///
/// Any ancestor left with a single child is merged back into a leaf that
/// takes over that child's start and end times. Returns `false` if nothing
/// exists at `path`.
pub fn remove_entry(entries: &mut Vec<Entry>, path: &EntryPath) -> bool {
    let removed = remove_at(entries, path.indices());
    if removed {
        tracing::debug!(%path, "removed entry");
    }
    removed
}

fn remove_at(entries: &mut Vec<Entry>, indices: &[usize]) -> bool {
    match indices {
        [] => false,
        [index] => {
            if *index >= entries.len() {
                return false;
            }
            entries.remove(*index);
            true
        }
        [index, rest @ ..] => {
            let Some(parent) = entries.get_mut(*index) else {
                return false;
            };
            if !remove_at(&mut parent.children, rest) {
                return false;
            }
            if parent.children.len() == 1 {
                let single = parent.children.remove(0);
                parent.start_time = single.start_time;
                parent.end_time = single.end_time;
            }
            true
        }
    }
}

/// Renames the entry at `path`. Empty names are ignored.
pub fn rename_entry(tracker: &mut Tracker, path: &EntryPath, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    let Some(entry) = tracker.get_mut(path) else {
        return false;
    };
    entry.name = name.to_string();
    true
}

/// Sets the start time of the leaf at `path`.
///
/// Branches derive their timing from children and are left untouched.
pub fn set_start_time(tracker: &mut Tracker, path: &EntryPath, secs: i64) -> bool {
    match tracker.get_mut(path) {
        Some(entry) if entry.is_leaf() => {
            entry.start_time = Some(secs);
            true
        }
        _ => false,
    }
}

/// Sets the end time of the leaf at `path`, stopping it if it was running.
pub fn set_end_time(tracker: &mut Tracker, path: &EntryPath, secs: i64) -> bool {
    match tracker.get_mut(path) {
        Some(entry) if entry.is_leaf() => {
            entry.end_time = Some(secs);
            true
        }
        _ => false,
    }
}
