//! Start command for beginning a new top-level segment.

use std::io::Write;

use anyhow::{Result, bail};
use seg_core::{Clock, find_running, start_new_entry};
use seg_doc::{DocumentStore, TrackerDocument};

use super::util::{load_for_mutation, persist};

pub fn run<W: Write, S: DocumentStore>(
    writer: &mut W,
    doc: &TrackerDocument<S>,
    clock: &impl Clock,
    name: Option<&str>,
    force: bool,
) -> Result<()> {
    let mut tracker = load_for_mutation(doc, force)?;
    if let Some(running) = find_running(&tracker.entries) {
        bail!(
            "'{}' is already running (use `seg next` or `seg stop`)",
            running.name
        );
    }

    let path = start_new_entry(&mut tracker, name.unwrap_or_default(), clock);
    persist(writer, doc, &tracker)?;

    if let Some(entry) = tracker.get(&path) {
        writeln!(writer, "Started {path}: {}", entry.name)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use seg_core::{Entry, Tracker};

    use super::*;
    use crate::commands::util::testing::*;

    #[test]
    fn start_appends_running_entry() {
        let doc = memory_doc(r#"{"entries":[{"name":"Design","startTime":100,"endTime":200}]}"#);
        let clock = clock_at(T);

        let mut buf = Vec::new();
        run(&mut buf, &doc, &clock, None, false).unwrap();

        assert_eq!(output(buf), "Started 2: Segment 2\n");
        assert_eq!(
            doc.load().unwrap(),
            Tracker::new(vec![
                Entry::leaf("Design", 100, 200),
                Entry::running("Segment 2", T),
            ])
        );
    }

    #[test]
    fn start_uses_given_name() {
        let doc = memory_doc("");
        let mut buf = Vec::new();
        run(&mut buf, &doc, &clock_at(T), Some("Review"), false).unwrap();
        assert_eq!(doc.load().unwrap().entries, vec![Entry::running("Review", T)]);
    }

    #[test]
    fn start_refuses_while_running() {
        let doc = memory_doc(r#"{"entries":[{"name":"Design","startTime":100}]}"#);
        let err = run(&mut Vec::new(), &doc, &clock_at(T), None, false).unwrap_err();
        assert!(err.to_string().contains("'Design' is already running"));
        assert_eq!(doc.load().unwrap().entries.len(), 1);
    }
}
