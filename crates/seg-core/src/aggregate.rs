//! Duration aggregation and formatting.
//!
//! All durations are in milliseconds. A running leaf is measured against
//! the clock on every call, so results are never cached.

use crate::clock::Clock;
use crate::entry::{Entry, Tracker, running_path};
use crate::types::EntryPath;

const MS_PER_SECOND: i64 = 1_000;

/// Duration of one entry.
///
/// Branches sum their children; a leaf measures from its start to its end,
/// or to now while it is running. A leaf without a start time counts as 0.
pub fn duration(entry: &Entry, clock: &impl Clock) -> i64 {
    if entry.is_branch() {
        return total_duration(&entry.children, clock);
    }
    let Some(start) = entry.start_time else {
        return 0;
    };
    let end_ms = entry
        .end_time
        .map_or_else(|| clock.now_millis(), |end| end.saturating_mul(MS_PER_SECOND));
    end_ms.saturating_sub(start.saturating_mul(MS_PER_SECOND))
}

/// Sum of the durations of `entries`, saturating at the `i64` bounds.
pub fn total_duration(entries: &[Entry], clock: &impl Clock) -> i64 {
    entries
        .iter()
        .map(|entry| duration(entry, clock))
        .fold(0, i64::saturating_add)
}

/// Sum of the durations of top-level entries that started today.
///
/// Only each top-level entry's own start time is checked. A split entry has
/// no start time of its own and is therefore never counted, even when one of
/// its parts is running today.
pub fn todays_duration(entries: &[Entry], clock: &impl Clock) -> i64 {
    let Some(today) = clock.today() else {
        return 0;
    };
    entries
        .iter()
        .filter(|entry| {
            entry
                .start_time
                .and_then(|start| clock.local_datetime(start))
                .is_some_and(|start| start.date() == today)
        })
        .map(|entry| duration(entry, clock))
        .fold(0, i64::saturating_add)
}

/// Formats a duration as its non-zero calendar components.
///
/// Components are years, months, days, hours and minutes, each followed by a
/// space (`"1h 30m "`). Months and minutes share the `m` suffix. Seconds are
/// dropped; zero and negative durations format as an empty string.
pub fn format_duration(ms: i64) -> String {
    if ms <= 0 {
        return String::new();
    }

    let total_minutes = ms / 60_000;
    let minutes = total_minutes % 60;
    let total_hours = total_minutes / 60;
    let hours = total_hours % 24;
    let mut days = total_hours / 24;

    // Average Gregorian month over a 400-year cycle: 146097 days / 4800 months
    let total_months = days * 4_800 / 146_097;
    days -= (total_months * 146_097 + 4_799) / 4_800;
    let years = total_months / 12;
    let months = total_months % 12;

    let mut output = String::new();
    for (value, unit) in [
        (years, 'y'),
        (months, 'm'),
        (days, 'd'),
        (hours, 'h'),
        (minutes, 'm'),
    ] {
        if value > 0 {
            output.push_str(&value.to_string());
            output.push(unit);
            output.push(' ');
        }
    }
    output
}

/// The values shown by a live display of a tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// The running entry, if any.
    pub running: Option<RunningSnapshot>,
    /// Today's total in milliseconds.
    pub today_ms: i64,
}

/// The running entry as seen by a live display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningSnapshot {
    pub path: EntryPath,
    pub name: String,
    pub elapsed_ms: i64,
}

impl Snapshot {
    /// Measures `tracker` at the clock's current time without changing it.
    pub fn capture(tracker: &Tracker, clock: &impl Clock) -> Self {
        let running = running_path(&tracker.entries).and_then(|path| {
            let entry = tracker.get(&path)?;
            Some(RunningSnapshot {
                name: entry.name.clone(),
                elapsed_ms: duration(entry, clock),
                path,
            })
        });
        Self {
            running,
            today_ms: todays_duration(&tracker.entries, clock),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    use super::*;
    use crate::clock::FixedClock;
    use crate::entry::flatten;

    // 2025-01-29T09:00:00Z
    const T: i64 = 1_738_141_200;
    const HOUR: i64 = 3_600;

    fn branch(name: &str, children: Vec<Entry>) -> Entry {
        Entry {
            name: name.to_string(),
            start_time: None,
            end_time: None,
            children,
        }
    }

    #[test]
    fn leaf_duration_is_end_minus_start_in_ms() {
        let clock = FixedClock::new(T);
        assert_eq!(duration(&Entry::leaf("A", 100, 400), &clock), 300_000);
    }

    #[test]
    fn running_leaf_duration_follows_clock() {
        let clock = FixedClock::new(T);
        let entry = Entry::running("A", T);

        clock.advance_millis(3_661_000);
        assert_eq!(duration(&entry, &clock), 3_661_000);

        clock.advance_millis(500);
        assert_eq!(duration(&entry, &clock), 3_661_500);
    }

    #[test]
    fn branch_duration_equals_children_total() {
        let clock = FixedClock::new(T + HOUR);
        let tree = branch(
            "Work",
            vec![
                Entry::leaf("Part 1", T - HOUR, T),
                branch(
                    "Part 2",
                    vec![Entry::leaf("a", T, T + 60), Entry::running("b", T + 120)],
                ),
            ],
        );

        for (_, entry) in flatten(std::slice::from_ref(&tree)) {
            if entry.is_branch() {
                assert_eq!(
                    duration(entry, &clock),
                    total_duration(&entry.children, &clock)
                );
            }
        }
        assert_eq!(
            duration(&tree, &clock),
            (HOUR + 60 + (HOUR - 120)) * 1_000
        );
    }

    #[test]
    fn total_duration_of_empty_is_zero() {
        assert_eq!(total_duration(&[], &FixedClock::new(T)), 0);
    }

    #[test]
    fn todays_duration_counts_top_level_entries_started_today() {
        let clock = FixedClock::new(T + 3 * HOUR);
        let entries = vec![
            Entry::leaf("yesterday", T - 20 * HOUR, T - 19 * HOUR),
            Entry::leaf("this morning", T, T + HOUR),
            Entry::running("now", T + 2 * HOUR),
        ];
        assert_eq!(todays_duration(&entries, &clock), 2 * HOUR * 1_000);
    }

    #[test]
    fn todays_duration_skips_split_entries() {
        // The branch has no start time of its own, so its running part today
        // does not count
        let clock = FixedClock::new(T + HOUR);
        let entries = vec![branch(
            "Work",
            vec![
                Entry::leaf("Part 1", T - 24 * HOUR, T - 23 * HOUR),
                Entry::running("Part 2", T),
            ],
        )];
        assert_eq!(todays_duration(&entries, &clock), 0);
    }

    #[test]
    fn todays_duration_uses_local_day() {
        // Ten hours west, 09:00Z is 23:00 on the previous local day
        let west = FixedOffset::west_opt(10 * 3_600).unwrap();

        let clock = FixedClock::new(T + 2 * HOUR).with_offset(west);
        let entries = vec![Entry::leaf("late", T, T + HOUR)];
        assert_eq!(todays_duration(&entries, &clock), 0);

        let clock = FixedClock::new(T).with_offset(west);
        let entries = vec![Entry::leaf("evening", T - 2 * HOUR, T)];
        assert_eq!(todays_duration(&entries, &clock), 2 * HOUR * 1_000);
    }

    #[test]
    fn format_duration_zero_and_negative_are_empty() {
        assert_eq!(format_duration(0), "");
        assert_eq!(format_duration(-60_000), "");
        assert_eq!(format_duration(59_999), "");
    }

    #[test]
    fn format_duration_hours_and_minutes() {
        assert_eq!(format_duration(90 * 60_000), "1h 30m ");
        assert_eq!(format_duration(3_661_000), "1h 1m ");
        assert_eq!(format_duration(3_600_000), "1h ");
        assert_eq!(format_duration(45 * 60_000), "45m ");
    }

    #[test]
    fn format_duration_days_months_years() {
        let day = 86_400_000;
        assert_eq!(format_duration(day + 5 * 60_000), "1d 5m ");
        assert_eq!(format_duration(30 * day), "30d ");
        assert_eq!(format_duration(31 * day), "1m ");
        assert_eq!(format_duration(45 * day), "1m 14d ");
        assert_eq!(format_duration(366 * day), "1y ");
    }

    #[test]
    fn snapshot_reports_running_entry_and_today() {
        let clock = FixedClock::new(T + HOUR);
        let tracker = Tracker::new(vec![
            Entry::leaf("A", T - HOUR, T),
            Entry::running("B", T + HOUR / 2),
        ]);

        let snapshot = Snapshot::capture(&tracker, &clock);

        assert_eq!(
            snapshot.running,
            Some(RunningSnapshot {
                path: EntryPath::top_level(1),
                name: "B".to_string(),
                elapsed_ms: HOUR / 2 * 1_000,
            })
        );
        assert_eq!(snapshot.today_ms, (HOUR + HOUR / 2) * 1_000);
    }

    #[test]
    fn snapshot_when_idle() {
        let clock = FixedClock::new(T);
        let snapshot = Snapshot::capture(&Tracker::default(), &clock);
        assert_eq!(snapshot.running, None);
        assert_eq!(snapshot.today_ms, 0);
    }

    #[test]
    fn durations_saturate_on_extreme_timestamps() {
        let clock = FixedClock::new(T);
        let far = Entry::leaf("Far", 0, i64::MAX);
        assert_eq!(duration(&far, &clock), i64::MAX);
        assert_eq!(total_duration(&[far.clone(), far], &clock), i64::MAX);

        let early = Entry::leaf("Early", -10_000_000_000_000_000, 100);
        assert_eq!(duration(&early, &clock), i64::MAX);

        let today = vec![Entry::leaf("A", T, i64::MAX), Entry::leaf("B", T, i64::MAX)];
        assert_eq!(todays_duration(&today, &clock), i64::MAX);
        assert!(!format_duration(i64::MAX).is_empty());
    }

    #[test]
    fn end_before_start_is_negative() {
        let clock = FixedClock::new(T);
        let entry = Entry::leaf("Backwards", 400, 100);
        assert_eq!(duration(&entry, &clock), -300_000);
        assert_eq!(format_duration(duration(&entry, &clock)), "");
    }
}
