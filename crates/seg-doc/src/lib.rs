//! Document storage for the segment tracker.
//!
//! A tracker lives as JSON inside a fenced code block of a Markdown document:
//!
//! ````markdown
//! ```simple-time-tracker
//! {"entries":[{"name":"Segment 1","startTime":1738141200}]}
//! ```
//! ````
//!
//! Saving replaces only the lines between the fences; every other byte of the
//! document is written back unchanged. The document is re-read on every save,
//! so edits made elsewhere in the file since the tracker was loaded survive.
//!
//! # Concurrency
//!
//! [`FileDocument`] writes the whole document to a temporary file and renames
//! it into place, holding an exclusive `fs2` lock on the target meanwhile. Two
//! processes saving the same block still race on read-modify-write; the last
//! writer wins.

mod block;

use std::cell::RefCell;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use seg_core::{CodecError, Tracker, decode, encode, try_decode};
use tempfile::NamedTempFile;
use thiserror::Error;

pub use block::{TRACKER_LANGUAGE, TrackerBlock, append_block, find_blocks, replace_block};

/// Document storage errors.
#[derive(Debug, Error)]
pub enum DocError {
    /// The document could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The document could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The store refuses writes.
    #[error("document is read-only")]
    ReadOnly,

    /// There is no tracker block at the requested index.
    #[error("no tracker block #{index} in document ({found} found)")]
    BlockNotFound { index: usize, found: usize },

    /// The tracker block does not hold a valid tracker.
    #[error("tracker block #{index} is corrupt: {source}")]
    Corrupt {
        index: usize,
        #[source]
        source: CodecError,
    },

    /// The tracker could not be serialized.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Whole-document read and write access.
pub trait DocumentStore {
    /// Returns the full document text.
    fn read(&self) -> Result<String, DocError>;

    /// Replaces the full document text.
    fn write(&self, content: &str) -> Result<(), DocError>;
}

/// A document on disk.
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: PathBuf,
}

impl FileDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentStore for FileDocument {
    fn read(&self) -> Result<String, DocError> {
        fs::read_to_string(&self.path).map_err(|source| DocError::Read {
            path: self.path.clone(),
            source,
        })
    }

    fn write(&self, content: &str) -> Result<(), DocError> {
        replace_file(&self.path, |file| file.write_all(content.as_bytes())).map_err(|source| {
            DocError::Write {
                path: self.path.clone(),
                source,
            }
        })?;

        tracing::debug!(path = %self.path.display(), bytes = content.len(), "wrote document");
        Ok(())
    }
}

/// Replaces the file at `path` with what `fill` writes.
///
/// The content goes to a temporary file in the same directory, which is
/// renamed over `path` only once it is complete and synced. A failed write
/// leaves the previous file untouched.
fn replace_file(path: &Path, fill: impl FnOnce(&mut File) -> io::Result<()>) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let target = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;
    // Held until `target` is dropped
    target.lock_exclusive()?;

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.as_file()
        .set_permissions(target.metadata()?.permissions())?;
    fill(temp.as_file_mut())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

/// An in-memory document, for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    content: RefCell<String>,
    read_only: bool,
}

impl MemoryDocument {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: RefCell::new(content.into()),
            read_only: false,
        }
    }

    /// Makes every write fail with [`DocError::ReadOnly`].
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn content(&self) -> String {
        self.content.borrow().clone()
    }
}

impl DocumentStore for MemoryDocument {
    fn read(&self) -> Result<String, DocError> {
        Ok(self.content())
    }

    fn write(&self, content: &str) -> Result<(), DocError> {
        if self.read_only {
            return Err(DocError::ReadOnly);
        }
        *self.content.borrow_mut() = content.to_string();
        Ok(())
    }
}

/// One tracker block of a document.
#[derive(Debug)]
pub struct TrackerDocument<S> {
    store: S,
    index: usize,
}

impl<S: DocumentStore> TrackerDocument<S> {
    /// Addresses the tracker block at `index` (zero-based, in document order).
    pub const fn new(store: S, index: usize) -> Self {
        Self { store, index }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    fn block(&self, text: &str) -> Result<TrackerBlock, DocError> {
        let mut blocks = find_blocks(text);
        let found = blocks.len();
        if self.index >= found {
            return Err(DocError::BlockNotFound {
                index: self.index,
                found,
            });
        }
        Ok(blocks.swap_remove(self.index))
    }

    /// Whether the tracker block is still present in the document.
    pub fn exists(&self) -> Result<bool, DocError> {
        let text = self.store.read()?;
        Ok(find_blocks(&text).len() > self.index)
    }

    /// Loads the tracker, treating a corrupt block as empty.
    pub fn load(&self) -> Result<Tracker, DocError> {
        let text = self.store.read()?;
        Ok(decode(&self.block(&text)?.body))
    }

    /// Loads the tracker, failing on a corrupt block.
    pub fn load_strict(&self) -> Result<Tracker, DocError> {
        let text = self.store.read()?;
        let block = self.block(&text)?;
        try_decode(&block.body).map_err(|source| DocError::Corrupt {
            index: self.index,
            source,
        })
    }

    /// Writes `tracker` into its block, leaving the rest of the document as is.
    pub fn save(&self, tracker: &Tracker) -> Result<(), DocError> {
        let body = encode(tracker)?;
        let text = self.store.read()?;
        let block = self.block(&text)?;
        self.store.write(&replace_block(&text, &block, &body))?;
        tracing::debug!(
            index = self.index,
            entries = tracker.entries.len(),
            "saved tracker"
        );
        Ok(())
    }

    /// Appends an empty tracker block if the document has none.
    ///
    /// Returns whether a block was added.
    pub fn init(&self) -> Result<bool, DocError> {
        let text = self.store.read()?;
        if !find_blocks(&text).is_empty() {
            return Ok(false);
        }
        let body = encode(&Tracker::default())?;
        self.store.write(&append_block(&text, &body))?;
        Ok(true)
    }
}
