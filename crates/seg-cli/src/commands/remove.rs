//! Remove command.

use std::io::Write;

use anyhow::Result;
use seg_core::{EntryPath, remove_entry};
use seg_doc::{DocumentStore, TrackerDocument};

use super::util::{entry_name, load_for_mutation, persist};

pub fn run<W: Write, S: DocumentStore>(
    writer: &mut W,
    doc: &TrackerDocument<S>,
    path: &EntryPath,
    force: bool,
) -> Result<()> {
    let mut tracker = load_for_mutation(doc, force)?;
    let name = entry_name(&tracker, path)?;
    remove_entry(&mut tracker.entries, path);
    persist(writer, doc, &tracker)?;

    writeln!(writer, "Removed {path}: {name}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use seg_core::Entry;

    use super::*;
    use crate::commands::util::testing::*;

    #[test]
    fn remove_part_collapses_parent() {
        let doc = memory_doc(r#"{"entries":[{"name":"Build","children":[{"name":"Part 1","startTime":1,"endTime":2},{"name":"Part 2","startTime":3,"endTime":4}]}]}"#);
        let path: EntryPath = "1.2".parse().unwrap();

        let mut buf = Vec::new();
        run(&mut buf, &doc, &path, false).unwrap();

        assert_eq!(output(buf), "Removed 1.2: Part 2\n");
        assert_eq!(doc.load().unwrap().entries, vec![Entry::leaf("Build", 1, 2)]);
    }

    #[test]
    fn remove_unknown_path_leaves_document() {
        let doc = memory_doc(r#"{"entries":[]}"#);
        let before = doc.store().content();
        let path: EntryPath = "1".parse().unwrap();

        assert!(run(&mut Vec::new(), &doc, &path, false).is_err());
        assert_eq!(doc.store().content(), before);
    }
}
