//! In-memory notes timeline.
//!
//! A note is a timestamped message kept for later inspection, typically by a
//! dashboard. The timeline knows nothing about sinks: [`NotesTimeline::append`]
//! only records whether the note should also be logged, and the caller
//! forwards it.

use crate::error::{Error, Result};
use crate::level::{normalize, LevelInput, LogLevel};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One recorded note. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub level: LogLevel,
    /// Whether the note was also forwarded to the log sinks
    pub was_logged: bool,
}

impl NoteEntry {
    pub fn as_tuple(&self) -> (DateTime<Local>, &str, LogLevel) {
        (self.timestamp, &self.message, self.level)
    }
}

/// Append-only, chronologically ordered list of notes.
#[derive(Debug, Default)]
pub struct NotesTimeline {
    entries: Mutex<Vec<NoteEntry>>,
}

impl NotesTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a note stamped with the current wall-clock time.
    ///
    /// Fails on an empty message or an unresolvable level, leaving the
    /// timeline untouched. If the clock stepped backwards since the last
    /// note, the previous timestamp is reused so order stays chronological.
    pub fn append(
        &self,
        message: &str,
        level: impl Into<LevelInput>,
        also_log: bool,
    ) -> Result<NoteEntry> {
        if message.is_empty() {
            return Err(Error::EmptyMessage);
        }
        let level = normalize(level)?;
        Ok(self.record(message.to_string(), level, also_log))
    }

    /// Store an already validated note.
    ///
    /// Callers that check the raw template themselves use this so that a
    /// template interpolating to an empty string is still recorded.
    pub(crate) fn record(&self, message: String, level: LogLevel, also_log: bool) -> NoteEntry {
        let mut entries = self.lock();
        let now = Local::now();
        let timestamp = match entries.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };
        let entry = NoteEntry {
            timestamp,
            message,
            level,
            was_logged: also_log,
        };
        entries.push(entry.clone());
        entry
    }

    /// Snapshot of the current entries, oldest first.
    pub fn read(&self) -> Notes {
        Notes {
            entries: self.lock().clone(),
        }
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<NoteEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Point-in-time view of a timeline.
///
/// Iterating does not consume the view, so it can be walked any number of
/// times. Serializes as a JSON array of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Notes {
    entries: Vec<NoteEntry>,
}

impl Notes {
    pub fn iter(&self) -> std::slice::Iter<'_, NoteEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&NoteEntry> {
        self.entries.last()
    }

    /// Timestamp column, in order
    pub fn timestamps(&self) -> Vec<DateTime<Local>> {
        self.entries.iter().map(|e| e.timestamp).collect()
    }

    /// Message column, in order
    pub fn messages(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.message.as_str()).collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<'a> IntoIterator for &'a Notes {
    type Item = &'a NoteEntry;
    type IntoIter = std::slice::Iter<'a, NoteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Notes {
    type Item = NoteEntry;
    type IntoIter = std::vec::IntoIter<NoteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_grows_by_one() {
        let timeline = NotesTimeline::new();
        for (i, level) in LogLevel::ALL.into_iter().enumerate() {
            let message = format!("note {}", i);
            timeline.append(&message, level, false).unwrap();

            let notes = timeline.read();
            assert_eq!(notes.len(), i + 1);
            let last = notes.last().unwrap();
            assert_eq!(last.message, message);
            assert_eq!(last.level, level);
        }
    }

    #[test]
    fn test_empty_message_is_rejected() {
        let timeline = NotesTimeline::new();
        assert!(matches!(
            timeline.append("", LogLevel::Info, true),
            Err(Error::EmptyMessage)
        ));
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_invalid_level_leaves_timeline_untouched() {
        let timeline = NotesTimeline::new();
        timeline.append("kept", "info", true).unwrap();
        assert!(matches!(
            timeline.append("dropped", "loud", true),
            Err(Error::InvalidLevel(_))
        ));
        assert_eq!(timeline.read().messages(), vec!["kept"]);
    }

    #[test]
    fn test_entries_are_chronological() {
        let timeline = NotesTimeline::new();
        for i in 0..50 {
            timeline.append(&format!("n{}", i), LogLevel::Debug, false).unwrap();
        }
        let stamps = timeline.read().timestamps();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_view_is_restartable() {
        let timeline = NotesTimeline::new();
        timeline.append("a", LogLevel::Info, true).unwrap();
        timeline.append("b", LogLevel::Warning, false).unwrap();

        let notes = timeline.read();
        let first: Vec<_> = notes.iter().map(|e| e.message.clone()).collect();
        let second: Vec<_> = (&notes).into_iter().map(|e| e.message.clone()).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec!["a", "b"]);

        let (_, message, level) = notes.last().unwrap().as_tuple();
        assert_eq!((message, level), ("b", LogLevel::Warning));
        assert!(!notes.last().unwrap().was_logged);
    }

    #[test]
    fn test_clear_empties_timeline() {
        let timeline = NotesTimeline::new();
        timeline.append("a", LogLevel::Info, true).unwrap();
        let before = timeline.read();

        timeline.clear();

        assert_eq!(timeline.len(), 0);
        assert!(timeline.read().iter().next().is_none());
        // Earlier snapshots are unaffected
        assert_eq!(before.len(), 1);
    }

    #[test]
    fn test_json_export() {
        let timeline = NotesTimeline::new();
        timeline.append("device online", LogLevel::Info, true).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&timeline.read().to_json().unwrap()).unwrap();
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["message"], "device online");
        assert_eq!(entries[0]["level"], "INFO");
        assert_eq!(entries[0]["was_logged"], true);
        assert!(entries[0]["timestamp"].is_string());
    }
}
