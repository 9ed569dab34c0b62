//! The entry tree: timed segments and their sub-segments.

use std::iter::Enumerate;
use std::slice;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::EntryPath;

/// A timed work segment.
///
/// An entry is either a leaf with its own `start_time` (and `end_time` once
/// stopped) or a branch whose duration is derived from its children. A
/// branch's own timestamps are cleared when it is split and are not
/// authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Display label.
    #[serde(default)]
    pub name: String,

    /// Start, in epoch seconds.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::timestamp"
    )]
    pub start_time: Option<i64>,

    /// End, in epoch seconds. Absent while the entry is running.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::timestamp"
    )]
    pub end_time: Option<i64>,

    /// Sub-segments in chronological order.
    #[serde(
        default,
        alias = "subEntries",
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::entries"
    )]
    pub children: Vec<Entry>,
}

impl Entry {
    /// Creates a stopped leaf.
    pub fn leaf(name: impl Into<String>, start_time: i64, end_time: i64) -> Self {
        Self {
            name: name.into(),
            start_time: Some(start_time),
            end_time: Some(end_time),
            children: Vec::new(),
        }
    }

    /// Creates a running leaf.
    pub fn running(name: impl Into<String>, start_time: i64) -> Self {
        Self {
            name: name.into(),
            start_time: Some(start_time),
            end_time: None,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_branch(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether this is a leaf that has not been stopped.
    pub fn is_running(&self) -> bool {
        self.is_leaf() && self.end_time.is_none()
    }
}

/// The root of a tracker: the forest of top-level entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracker {
    #[serde(default, deserialize_with = "lenient::entries")]
    pub entries: Vec<Entry>,
}

impl Tracker {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Looks up the entry at `path`.
    pub fn get(&self, path: &EntryPath) -> Option<&Entry> {
        let (first, rest) = path.indices().split_first()?;
        let mut entry = self.entries.get(*first)?;
        for index in rest {
            entry = entry.children.get(*index)?;
        }
        Some(entry)
    }

    /// Looks up the entry at `path` for mutation.
    pub fn get_mut(&mut self, path: &EntryPath) -> Option<&mut Entry> {
        let (first, rest) = path.indices().split_first()?;
        let mut entry = self.entries.get_mut(*first)?;
        for index in rest {
            entry = entry.children.get_mut(*index)?;
        }
        Some(entry)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Returns the first running leaf, searching depth-first in order.
pub fn find_running(entries: &[Entry]) -> Option<&Entry> {
    for entry in entries {
        if entry.is_branch() {
            if let Some(running) = find_running(&entry.children) {
                return Some(running);
            }
        } else if entry.end_time.is_none() {
            return Some(entry);
        }
    }
    None
}

/// Returns the position of the entry [`find_running`] would return.
pub fn running_path(entries: &[Entry]) -> Option<EntryPath> {
    flatten(entries)
        .find(|(_, entry)| entry.is_running())
        .map(|(path, _)| path)
}

/// Whether any leaf in the tracker is running.
pub fn is_running(tracker: &Tracker) -> bool {
    find_running(&tracker.entries).is_some()
}

/// Iterates the forest depth-first, parents before their children.
pub fn flatten(entries: &[Entry]) -> Flatten<'_> {
    Flatten {
        stack: vec![entries.iter().enumerate()],
        prefix: Vec::new(),
    }
}

/// Depth-first pre-order iterator over a forest, yielding each entry with
/// its position.
#[derive(Debug, Clone)]
pub struct Flatten<'a> {
    stack: Vec<Enumerate<slice::Iter<'a, Entry>>>,
    prefix: Vec<usize>,
}

impl<'a> Iterator for Flatten<'a> {
    type Item = (EntryPath, &'a Entry);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            if let Some((index, entry)) = level.next() {
                let mut indices = self.prefix.clone();
                indices.push(index);
                if entry.is_branch() {
                    self.prefix.push(index);
                    self.stack.push(entry.children.iter().enumerate());
                }
                return Some((EntryPath::from_indices_unchecked(indices), entry));
            }
            self.stack.pop();
            self.prefix.pop();
        }
    }
}

/// A structural problem found in a tracker.
///
/// Trackers are edited by hand inside documents, so these are reported
/// rather than rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("more than one running entry: {}", join_paths(.paths))]
    MultipleRunning { paths: Vec<EntryPath> },

    #[error("entry {path} has no start time")]
    LeafWithoutStart { path: EntryPath },

    #[error("entry {path} has a single sub-entry")]
    SingleChildBranch { path: EntryPath },
}

fn join_paths(paths: &[EntryPath]) -> String {
    paths
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Checks the tree invariants, returning every violation found.
pub fn validate(tracker: &Tracker) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut running = Vec::new();

    for (path, entry) in flatten(&tracker.entries) {
        if entry.is_branch() {
            if entry.children.len() == 1 {
                violations.push(InvariantViolation::SingleChildBranch { path });
            }
            continue;
        }
        if entry.start_time.is_none() {
            violations.push(InvariantViolation::LeafWithoutStart { path: path.clone() });
        }
        if entry.end_time.is_none() {
            running.push(path);
        }
    }

    if running.len() > 1 {
        violations.insert(0, InvariantViolation::MultipleRunning { paths: running });
    }
    violations
}

/// Deserializers tolerant of trackers written by hand or by older versions.
mod lenient {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    use super::Entry;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Int(i64),
        Float(f64),
        Text(String),
    }

    /// Accepts integer, float or numeric-string epoch seconds. `null`, blank
    /// and unparseable strings (such as "Invalid date") mean absent.
    #[allow(clippy::cast_possible_truncation)]
    pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawTimestamp>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawTimestamp::Int(secs)) => Ok(Some(secs)),
            Some(RawTimestamp::Float(secs)) if secs.is_finite() => Ok(Some(secs.trunc() as i64)),
            Some(RawTimestamp::Float(secs)) => Err(D::Error::custom(format!(
                "invalid timestamp: {secs}"
            ))),
            Some(RawTimestamp::Text(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                if let Ok(secs) = text.parse::<i64>() {
                    return Ok(Some(secs));
                }
                match text.parse::<f64>() {
                    Ok(secs) if secs.is_finite() => Ok(Some(secs.trunc() as i64)),
                    _ => {
                        tracing::warn!(value = text, "ignoring unparseable timestamp");
                        Ok(None)
                    }
                }
            }
        }
    }

    /// Treats `null` as an empty list.
    pub fn entries<'de, D>(deserializer: D) -> Result<Vec<Entry>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Vec<Entry>>::deserialize(deserializer)?.unwrap_or_default())
    }
}
