//! Split command for continuing a segment as a new part.

use std::io::Write;

use anyhow::{Result, bail};
use seg_core::{Clock, EntryPath, find_running, start_sub_entry};
use seg_doc::{DocumentStore, TrackerDocument};

use super::util::{load_for_mutation, persist};

pub fn run<W: Write, S: DocumentStore>(
    writer: &mut W,
    doc: &TrackerDocument<S>,
    clock: &impl Clock,
    path: &EntryPath,
    name: Option<&str>,
    force: bool,
) -> Result<()> {
    let mut tracker = load_for_mutation(doc, force)?;
    if let Some(running) = find_running(&tracker.entries) {
        bail!(
            "'{}' is running; stop it before continuing another segment",
            running.name
        );
    }

    let Some(entry) = tracker.get_mut(path) else {
        bail!("no entry at {path}");
    };
    let index = start_sub_entry(entry, name.unwrap_or_default(), clock);
    let parent = entry.name.clone();
    let part = entry.children[index].name.clone();
    persist(writer, doc, &tracker)?;

    writeln!(writer, "Continuing {parent} as {}: {part}", path.child(index))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use seg_core::{Entry, FixedClock};

    use super::*;
    use crate::commands::util::testing::*;

    #[test]
    fn split_turns_leaf_into_branch() {
        let doc = memory_doc(&format!(
            r#"{{"entries":[{{"name":"Design","startTime":{},"endTime":{}}}]}}"#,
            T - 3_600,
            T - 1_800
        ));
        let path: EntryPath = "1".parse().unwrap();

        let mut buf = Vec::new();
        run(&mut buf, &doc, &clock_at(T), &path, None, false).unwrap();

        assert_eq!(output(buf), "Continuing Design as 1.2: Part 2\n");
        let design = &doc.load().unwrap().entries[0];
        assert_eq!(design.start_time, None);
        assert_eq!(design.end_time, None);
        assert_eq!(
            design.children,
            vec![
                Entry::leaf("Part 1", T - 3_600, T - 1_800),
                Entry::running("Part 2", T),
            ]
        );
    }

    #[test]
    fn split_nested_part_with_name() {
        let doc = memory_doc(r#"{"entries":[{"name":"Build","children":[{"name":"Part 1","startTime":1,"endTime":2},{"name":"Part 2","startTime":3,"endTime":4}]}]}"#);
        let path: EntryPath = "1.2".parse().unwrap();
        let clock = FixedClock::new(10);

        let mut buf = Vec::new();
        run(&mut buf, &doc, &clock, &path, Some("Tests"), false).unwrap();

        assert_eq!(output(buf), "Continuing Part 2 as 1.2.2: Tests\n");
        let part = &doc.load().unwrap().entries[0].children[1];
        assert_eq!(
            part.children,
            vec![Entry::leaf("Part 1", 3, 4), Entry::running("Tests", 10)]
        );
    }

    #[test]
    fn split_refused_while_running() {
        let doc = memory_doc(r#"{"entries":[{"name":"A","startTime":1,"endTime":2},{"name":"B","startTime":3}]}"#);
        let path: EntryPath = "1".parse().unwrap();
        let err = run(&mut Vec::new(), &doc, &clock_at(T), &path, None, false).unwrap_err();
        assert!(err.to_string().contains("'B' is running"));
    }

    #[test]
    fn split_unknown_path_fails() {
        let doc = memory_doc(r#"{"entries":[{"name":"A","startTime":1,"endTime":2}]}"#);
        let path: EntryPath = "3".parse().unwrap();
        let err = run(&mut Vec::new(), &doc, &clock_at(T), &path, None, false).unwrap_err();
        assert_eq!(err.to_string(), "no entry at 3");
    }
}
