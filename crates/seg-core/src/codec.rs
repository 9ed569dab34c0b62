//! Persisted JSON form of a tracker.

use thiserror::Error;

use crate::entry::Tracker;

/// Tracker serialization errors.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The persisted text was not a valid tracker.
    #[error("malformed tracker data: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The tracker could not be serialized.
    #[error("failed to encode tracker: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Parses persisted text, reporting malformed input.
///
/// Empty or whitespace-only text is an empty tracker.
pub fn try_decode(text: &str) -> Result<Tracker, CodecError> {
    if text.trim().is_empty() {
        return Ok(Tracker::default());
    }
    serde_json::from_str(text).map_err(CodecError::Malformed)
}

/// Parses persisted text, falling back to an empty tracker.
///
/// Corrupt state must never block display, so parse failures are logged
/// and recovered here.
pub fn decode(text: &str) -> Tracker {
    try_decode(text).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "failed to parse tracker, using an empty one");
        Tracker::default()
    })
}

/// Serializes a tracker to its compact persisted form.
pub fn encode(tracker: &Tracker) -> Result<String, CodecError> {
    serde_json::to_string(tracker).map_err(CodecError::Encode)
}
