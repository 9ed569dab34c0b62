//! Core type definitions with validation.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The entry path had no segments.
    #[error("entry path cannot be empty")]
    EmptyPath,

    /// A path segment was not a positive integer.
    #[error("invalid entry path segment {segment:?}: positions start at 1")]
    InvalidPathSegment { segment: String },

    /// The export format name was not recognised.
    #[error("unknown export format: {value}")]
    UnknownExportFormat { value: String },
}

/// Position of an entry in the forest.
///
/// Entries have no stable identity of their own once they round-trip through
/// the document, so an entry is addressed by the zero-based child indices
/// leading to it from the top level. Users see and type the one-based,
/// dot-separated form (`2.1` is the first part of the second segment).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryPath(Vec<usize>);

impl EntryPath {
    /// Path of the top-level entry at `index`.
    pub fn top_level(index: usize) -> Self {
        Self(vec![index])
    }

    /// Path of this entry's child at `index`.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Zero-based indices from the top level down.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Nesting depth; top-level entries are at depth 0.
    pub fn depth(&self) -> usize {
        self.0.len() - 1
    }

    pub(crate) const fn from_indices_unchecked(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for EntryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", index + 1)?;
        }
        Ok(())
    }
}

impl FromStr for EntryPath {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::EmptyPath);
        }
        let indices = s
            .split('.')
            .map(|segment| match segment.parse::<usize>() {
                Ok(position) if position > 0 => Ok(position - 1),
                _ => Err(ValidationError::InvalidPathSegment {
                    segment: segment.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(indices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_path_rejects_empty() {
        assert_eq!("".parse::<EntryPath>(), Err(ValidationError::EmptyPath));
        assert_eq!("  ".parse::<EntryPath>(), Err(ValidationError::EmptyPath));
    }

    #[test]
    fn entry_path_parses_one_based() {
        let path: EntryPath = "2.1".parse().unwrap();
        assert_eq!(path.indices(), &[1, 0]);
        assert_eq!(path.depth(), 1);
        assert_eq!(path.to_string(), "2.1");
    }

    #[test]
    fn entry_path_rejects_zero_and_garbage() {
        assert!(matches!(
            "0".parse::<EntryPath>(),
            Err(ValidationError::InvalidPathSegment { .. })
        ));
        assert!(matches!(
            "1..2".parse::<EntryPath>(),
            Err(ValidationError::InvalidPathSegment { .. })
        ));
        assert!(matches!(
            "a".parse::<EntryPath>(),
            Err(ValidationError::InvalidPathSegment { .. })
        ));
    }

    #[test]
    fn entry_path_navigation() {
        let top = EntryPath::top_level(2);
        let child = top.child(0);
        assert_eq!(child.to_string(), "3.1");
        assert_eq!(child.depth(), top.depth() + 1);
    }
}
