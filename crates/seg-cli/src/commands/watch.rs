//! Watch command: redraw the running segment and today's total every second.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use seg_core::{Clock, Snapshot};
use seg_doc::{DocumentStore, TrackerDocument};

use super::show::format_snapshot;

const TICK: Duration = Duration::from_secs(1);

pub fn run<W: Write, S: DocumentStore>(
    writer: &mut W,
    doc: &TrackerDocument<S>,
    clock: &impl Clock,
) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    runtime.block_on(watch(writer, doc, clock, TICK))
}

async fn watch<W: Write, S: DocumentStore>(
    writer: &mut W,
    doc: &TrackerDocument<S>,
    clock: &impl Clock,
    period: Duration,
) -> Result<()> {
    let mut interval = tokio::time::interval(period);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut ctrl_c => break,
        }
        if !tick(writer, doc, clock)? {
            writeln!(writer, "Tracker block is gone; stopping.")?;
            break;
        }
    }
    Ok(())
}

/// Redraws once. Returns false once the tracker block no longer exists.
fn tick<W: Write, S: DocumentStore>(
    writer: &mut W,
    doc: &TrackerDocument<S>,
    clock: &impl Clock,
) -> Result<bool> {
    match doc.exists() {
        Ok(true) => {}
        Ok(false) => return Ok(false),
        Err(err) => {
            tracing::warn!(error = %err, "document unavailable");
            return Ok(false);
        }
    }
    let tracker = doc.load().context("failed to load tracker")?;
    writeln!(writer, "{}", format_snapshot(&Snapshot::capture(&tracker, clock)))?;
    writer.flush()?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use seg_core::FixedClock;

    use super::*;
    use crate::commands::util::testing::*;

    #[test]
    fn tick_reports_running_entry() {
        let doc = memory_doc(&format!(r#"{{"entries":[{{"name":"Design","startTime":{T}}}]}}"#));
        let clock = FixedClock::new(T + 120);

        let mut buf = Vec::new();
        assert!(tick(&mut buf, &doc, &clock).unwrap());
        clock.advance_millis(60_000);
        assert!(tick(&mut buf, &doc, &clock).unwrap());

        assert_eq!(
            output(buf),
            "Running 1: Design for 2m | Today: 2m\nRunning 1: Design for 3m | Today: 3m\n"
        );
    }

    #[test]
    fn watch_stops_when_block_disappears() {
        let doc = memory_doc(r#"{"entries":[]}"#);
        let clock = clock_at(T);
        let runtime = tokio::runtime::Runtime::new().unwrap();

        let mut buf = Vec::new();
        runtime
            .block_on(async {
                assert!(tick(&mut buf, &doc, &clock).unwrap());
                doc.store().write("# Log\n\nblock removed\n").unwrap();
                watch(&mut buf, &doc, &clock, Duration::from_millis(5)).await
            })
            .unwrap();

        assert_eq!(
            output(buf),
            "Idle | Today: 0m\nTracker block is gone; stopping.\n"
        );
    }
}
