//! Core domain logic for the segment tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - The entry tree: timed segments that can be split into sub-segments
//! - Mutation: starting, stopping, splitting and removing entries
//! - Aggregation: recursive durations and today's total
//! - Serialization and exports: JSON, Markdown table, CSV and Turtle

pub mod aggregate;
pub mod clock;
pub mod codec;
pub mod entry;
pub mod export;
pub mod mutation;
pub mod types;

pub use aggregate::{
    RunningSnapshot, Snapshot, duration, format_duration, todays_duration, total_duration,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::{CodecError, decode, encode, try_decode};
pub use entry::{
    Entry, Flatten, InvariantViolation, Tracker, find_running, flatten, is_running, running_path,
    validate,
};
pub use export::{ExportFormat, ExportSettings, Exporter};
pub use mutation::{
    end_running_entry, remove_entry, rename_entry, set_end_time, set_start_time, start_new_entry,
    start_sub_entry,
};
pub use types::{EntryPath, ValidationError};
