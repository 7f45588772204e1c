//! Lifecycle of one uploaded file.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Where a file is in the ingestion lifecycle.
///
/// ```text
/// Received -> Parsing -> FormatKnown | FormatUnknown -> MappingConfirmed
///          -> Validating -> Normalizing -> Stored
///                        -> Reported
/// ```
///
/// Any non-terminal state may move to `Failed`. There is no retry: a failed
/// file has to be submitted again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileState {
    Received,
    Parsing,
    FormatKnown,
    FormatUnknown,
    MappingConfirmed,
    Validating,
    Normalizing,
    /// Normalized claims were handed to the sink.
    Stored,
    /// No row passed validation; issues were reported and nothing stored.
    Reported,
    Failed,
}

impl FileState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Parsing => "parsing",
            Self::FormatKnown => "formatKnown",
            Self::FormatUnknown => "formatUnknown",
            Self::MappingConfirmed => "mappingConfirmed",
            Self::Validating => "validating",
            Self::Normalizing => "normalizing",
            Self::Stored => "stored",
            Self::Reported => "reported",
            Self::Failed => "failed",
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Stored | Self::Reported | Self::Failed)
    }

    pub fn can_transition_to(&self, next: FileState) -> bool {
        use FileState::{
            Failed, FormatKnown, FormatUnknown, MappingConfirmed, Normalizing, Parsing, Received,
            Reported, Stored, Validating,
        };
        match (self, next) {
            (state, Failed) => !state.is_terminal(),
            (Received, Parsing)
            | (Parsing, FormatKnown | FormatUnknown)
            | (FormatKnown | FormatUnknown, MappingConfirmed)
            | (MappingConfirmed, Validating)
            | (Validating, Normalizing | Reported)
            | (Normalizing, Stored) => true,
            _ => false,
        }
    }
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks and logs the state of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTracker {
    file_id: String,
    state: FileState,
}

impl FileTracker {
    pub fn new(file_id: impl Into<String>) -> Self {
        let file_id = file_id.into();
        debug!(file_id = %file_id, state = %FileState::Received, "file received");
        Self {
            file_id,
            state: FileState::Received,
        }
    }

    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    pub fn state(&self) -> FileState {
        self.state
    }

    /// Moves to `next`. Returns `false` and keeps the current state when the
    /// transition is not part of the lifecycle.
    pub fn advance(&mut self, next: FileState) -> bool {
        if !self.state.can_transition_to(next) {
            warn!(
                file_id = %self.file_id,
                from = %self.state,
                to = %next,
                "ignored invalid file state transition"
            );
            return false;
        }
        debug!(file_id = %self.file_id, from = %self.state, to = %next, "file state changed");
        self.state = next;
        true
    }

    /// Marks the file failed, logging `reason`.
    pub fn fail(&mut self, reason: &dyn fmt::Display) {
        warn!(file_id = %self.file_id, from = %self.state, %reason, "file failed");
        if !self.state.is_terminal() {
            self.state = FileState::Failed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut tracker = FileTracker::new("abc");
        for next in [
            FileState::Parsing,
            FileState::FormatUnknown,
            FileState::MappingConfirmed,
            FileState::Validating,
            FileState::Normalizing,
            FileState::Stored,
        ] {
            assert!(tracker.advance(next), "{next}");
        }
        assert!(tracker.state().is_terminal());
    }

    #[test]
    fn test_invalid_transition_is_ignored() {
        let mut tracker = FileTracker::new("abc");
        assert!(!tracker.advance(FileState::Validating));
        assert_eq!(tracker.state(), FileState::Received);
    }

    #[test]
    fn test_terminal_states_stay_put() {
        let mut tracker = FileTracker::new("abc");
        tracker.fail(&"empty file");
        assert_eq!(tracker.state(), FileState::Failed);
        assert!(!tracker.advance(FileState::Parsing));
        assert!(!FileState::Stored.can_transition_to(FileState::Failed));
        assert!(FileState::Validating.can_transition_to(FileState::Reported));
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(
            serde_json::to_string(&FileState::MappingConfirmed).unwrap(),
            "\"mappingConfirmed\""
        );
    }
}
