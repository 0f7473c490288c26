//! Per-session shell state: working directory and command history.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::execution::CommandResult;

/// One executed command as recorded in a session's history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    /// Command text as submitted.
    pub command: String,
    /// Result returned to the client.
    pub result: CommandResult,
    /// Completion time.
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time.
    pub fn new(command: impl Into<String>, result: CommandResult) -> Self {
        Self {
            command: command.into(),
            result,
            timestamp: Utc::now(),
        }
    }
}

/// Mutable shell state owned by a session.
///
/// The working directory is never empty. History is append-only in
/// execution order; when a limit is set the oldest entries are evicted.
#[derive(Debug, Clone)]
pub struct SessionState {
    working_dir: PathBuf,
    history: VecDeque<HistoryEntry>,
    history_limit: Option<usize>,
}

impl SessionState {
    /// Create state rooted at `working_dir` with empty history.
    pub fn new(working_dir: impl Into<PathBuf>, history_limit: Option<usize>) -> Self {
        Self {
            working_dir: working_dir.into(),
            history: VecDeque::new(),
            history_limit,
        }
    }

    /// Current working directory.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Replace the working directory. Empty paths are ignored.
    pub fn set_working_dir(&mut self, dir: impl Into<PathBuf>) {
        let dir = dir.into();
        if !dir.as_os_str().is_empty() {
            self.working_dir = dir;
        }
    }

    /// Recorded commands, oldest first.
    pub fn history(&self) -> impl ExactSizeIterator<Item = &HistoryEntry> {
        self.history.iter()
    }

    /// Number of recorded commands.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Most recently recorded command.
    pub fn last_entry(&self) -> Option<&HistoryEntry> {
        self.history.back()
    }

    /// Configured history bound.
    pub fn history_limit(&self) -> Option<usize> {
        self.history_limit
    }

    /// Append an entry, evicting the oldest if over the limit.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.history.push_back(entry);
        if let Some(limit) = self.history_limit {
            while self.history.len() > limit {
                self.history.pop_front();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(command: &str) -> HistoryEntry {
        HistoryEntry::new(
            command,
            CommandResult::from_output(b"", b"", 0, Path::new("/")),
        )
    }

    #[test]
    fn test_new_state() {
        let state = SessionState::new("/home/user", None);
        assert_eq!(state.working_dir(), Path::new("/home/user"));
        assert_eq!(state.history_len(), 0);
        assert!(state.last_entry().is_none());
    }

    #[test]
    fn test_set_working_dir_ignores_empty() {
        let mut state = SessionState::new("/srv", None);
        state.set_working_dir("");
        assert_eq!(state.working_dir(), Path::new("/srv"));
        state.set_working_dir("/tmp");
        assert_eq!(state.working_dir(), Path::new("/tmp"));
    }

    #[test]
    fn test_record_keeps_order() {
        let mut state = SessionState::new("/", None);
        for cmd in ["ls", "pwd", "whoami"] {
            state.record(entry(cmd));
        }
        let commands: Vec<_> = state.history().map(|e| e.command.as_str()).collect();
        assert_eq!(commands, vec!["ls", "pwd", "whoami"]);
        assert_eq!(state.last_entry().unwrap().command, "whoami");
    }

    #[test]
    fn test_history_limit_evicts_oldest() {
        let mut state = SessionState::new("/", Some(2));
        state.record(entry("one"));
        state.record(entry("two"));
        state.record(entry("three"));

        assert_eq!(state.history_len(), 2);
        let commands: Vec<_> = state.history().map(|e| e.command.as_str()).collect();
        assert_eq!(commands, vec!["two", "three"]);
    }

    #[test]
    fn test_history_entry_serializes_timestamp() {
        let json = serde_json::to_value(entry("ls")).unwrap();
        assert_eq!(json["command"], "ls");
        assert!(json["timestamp"].is_string());
    }
}
