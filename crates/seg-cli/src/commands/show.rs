//! Show command: a day-grouped view of the tracker.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use seg_core::{Clock, Entry, Snapshot, Tracker, duration, flatten, validate};
use seg_doc::{DocumentStore, TrackerDocument};

use super::util::display_duration;

/// Day header pattern, e.g. "Mon, Jan 27, 2025".
const DAY_HEADER_FORMAT: &str = "%a, %b %d, %Y";
const CLOCK_TIME_FORMAT: &str = "%-H:%M";

pub fn run<W: Write, S: DocumentStore>(
    writer: &mut W,
    doc: &TrackerDocument<S>,
    clock: &impl Clock,
) -> Result<()> {
    let tracker = doc.load().context("failed to load tracker")?;
    for violation in validate(&tracker) {
        tracing::warn!(%violation, "tracker is inconsistent");
    }
    write!(writer, "{}", render(&tracker, clock))?;
    Ok(())
}

/// Renders every entry, indented by depth, under a header for each day.
///
/// A new header starts whenever a top-level entry begins on a different
/// local day than the previous one. The running entry and today's total
/// follow at the end.
pub fn render(tracker: &Tracker, clock: &impl Clock) -> String {
    let mut output = String::new();
    if tracker.is_empty() {
        output.push_str("No segments yet.\n");
    }

    let mut current_day: Option<NaiveDate> = None;
    for (path, entry) in flatten(&tracker.entries) {
        if path.depth() == 0 {
            let day = first_start(entry)
                .and_then(|secs| clock.local_datetime(secs))
                .map(|dt| dt.date());
            if let Some(day) = day.filter(|day| current_day != Some(*day)) {
                if current_day.is_some() {
                    output.push('\n');
                }
                output.push_str(&format!("{}\n", day.format(DAY_HEADER_FORMAT)));
                current_day = Some(day);
            }
        }

        let columns = [
            path.to_string(),
            entry.name.clone(),
            time_range(entry, clock),
            display_duration(duration(entry, clock)),
        ];
        let line: Vec<&str> = columns
            .iter()
            .map(String::as_str)
            .filter(|column| !column.is_empty())
            .collect();
        output.push_str(&"  ".repeat(path.depth() + 1));
        output.push_str(&line.join("  "));
        output.push('\n');
    }

    output.push('\n');
    output.push_str(&format_snapshot(&Snapshot::capture(tracker, clock)));
    output.push('\n');
    output
}

/// One-line summary of the running entry and today's total.
pub fn format_snapshot(snapshot: &Snapshot) -> String {
    let today = display_duration(snapshot.today_ms);
    match &snapshot.running {
        Some(running) => format!(
            "Running {}: {} for {} | Today: {today}",
            running.path,
            running.name,
            display_duration(running.elapsed_ms)
        ),
        None => format!("Idle | Today: {today}"),
    }
}

/// Start of the entry, or of its earliest-listed part for a split entry.
fn first_start(entry: &Entry) -> Option<i64> {
    entry
        .start_time
        .or_else(|| entry.children.iter().find_map(first_start))
}

fn time_range(entry: &Entry, clock: &impl Clock) -> String {
    if entry.is_branch() {
        return String::new();
    }
    let clock_time = |secs: i64| {
        clock
            .local_datetime(secs)
            .map(|dt| dt.format(CLOCK_TIME_FORMAT).to_string())
            .unwrap_or_default()
    };
    match (entry.start_time, entry.end_time) {
        (Some(start), Some(end)) => format!("{}-{}", clock_time(start), clock_time(end)),
        (Some(start), None) => format!("{}-now", clock_time(start)),
        (None, _) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::commands::util::testing::*;

    fn sample() -> Tracker {
        Tracker::new(vec![
            Entry::leaf("Standup", T - 86_400, T - 86_400 + 900),
            Entry::leaf("Design", T, T + 5_400),
            Entry {
                name: "Build".to_string(),
                start_time: None,
                end_time: None,
                children: vec![
                    Entry::leaf("Part 1", T + 5_400, T + 7_200),
                    Entry::running("Part 2", T + 7_200),
                ],
            },
        ])
    }

    #[test]
    fn render_groups_by_day() {
        let rendered = render(&sample(), &clock_at(T + 10_800));
        assert_snapshot!(rendered, @r"
        Tue, Jan 28, 2025
          1  Standup  9:00-9:15  15m

        Wed, Jan 29, 2025
          2  Design  9:00-10:30  1h 30m
          3  Build  1h 30m
            3.1  Part 1  10:30-11:00  30m
            3.2  Part 2  11:00-now  1h

        Running 3.2: Part 2 for 1h | Today: 1h 30m
        ");
    }

    #[test]
    fn render_empty_tracker() {
        assert_eq!(
            render(&Tracker::default(), &clock_at(T)),
            "No segments yet.\n\nIdle | Today: 0m\n"
        );
    }

    #[test]
    fn run_reads_document() {
        let doc = memory_doc(&format!(
            r#"{{"entries":[{{"name":"Design","startTime":{T},"endTime":{}}}]}}"#,
            T + 1_800
        ));
        let mut buf = Vec::new();
        run(&mut buf, &doc, &clock_at(T + 3_600)).unwrap();
        assert_eq!(
            output(buf),
            "Wed, Jan 29, 2025\n  1  Design  9:00-9:30  30m\n\nIdle | Today: 30m\n"
        );
    }

    #[test]
    fn run_shows_corrupt_block_as_empty() {
        let doc = memory_doc("{broken");
        let mut buf = Vec::new();
        run(&mut buf, &doc, &clock_at(T)).unwrap();
        assert!(output(buf).starts_with("No segments yet."));
    }
}
