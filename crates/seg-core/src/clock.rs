//! Injectable time source.
//!
//! Everything that needs "now" or the local calendar goes through [`Clock`],
//! so durations and day windows are deterministic under test.

use std::cell::Cell;

use chrono::{
    DateTime, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};

/// Source of the current time and of local wall-clock conversions.
pub trait Clock {
    /// Current time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;

    /// Wall-clock time in the local timezone for the given epoch seconds.
    fn local_datetime(&self, secs: i64) -> Option<NaiveDateTime>;

    /// Epoch seconds for a local wall-clock time.
    ///
    /// Returns `None` for times skipped by a DST transition.
    fn timestamp_from_local(&self, local: NaiveDateTime) -> Option<i64>;

    /// Current time in whole seconds since the Unix epoch.
    fn now(&self) -> i64 {
        self.now_millis().div_euclid(1000)
    }

    /// Current local calendar day.
    fn today(&self) -> Option<NaiveDate> {
        self.local_datetime(self.now()).map(|dt| dt.date())
    }
}

/// The system clock in the machine's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn local_datetime(&self, secs: i64) -> Option<NaiveDateTime> {
        Local
            .timestamp_opt(secs, 0)
            .single()
            .map(|dt| dt.naive_local())
    }

    fn timestamp_from_local(&self, local: NaiveDateTime) -> Option<i64> {
        match Local.from_local_datetime(&local) {
            // Ambiguous (DST fall-back): use the earlier time
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.timestamp()),
            LocalResult::None => None,
        }
    }
}

/// A manually driven clock with a fixed UTC offset.
#[derive(Debug, Clone)]
pub struct FixedClock {
    millis: Cell<i64>,
    offset: FixedOffset,
}

impl FixedClock {
    /// Creates a clock frozen at the given epoch seconds, in UTC.
    pub fn new(secs: i64) -> Self {
        Self::from_millis(secs.saturating_mul(1000))
    }

    /// Creates a clock frozen at the given epoch milliseconds, in UTC.
    pub fn from_millis(millis: i64) -> Self {
        Self {
            millis: Cell::new(millis),
            offset: Utc.fix(),
        }
    }

    /// Uses the given offset for local-time conversions.
    #[must_use]
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Moves the clock to the given epoch seconds.
    pub fn set(&self, secs: i64) {
        self.millis.set(secs.saturating_mul(1000));
    }

    /// Moves the clock forward by `millis`.
    pub fn advance_millis(&self, millis: i64) {
        self.millis.set(self.millis.get() + millis);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.millis.get()
    }

    fn local_datetime(&self, secs: i64) -> Option<NaiveDateTime> {
        DateTime::from_timestamp(secs, 0).map(|dt| dt.with_timezone(&self.offset).naive_local())
    }

    fn timestamp_from_local(&self, local: NaiveDateTime) -> Option<i64> {
        self.offset
            .from_local_datetime(&local)
            .single()
            .map(|dt| dt.timestamp())
    }
}
