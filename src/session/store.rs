//! Session storage and management.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::{HistoryEntry, SessionId, SessionState};
use crate::dispatch::{normalize, SessionEvent};
use crate::error::ShellRelayError;
use crate::execution::platform_root;
use crate::Result;

/// Configuration for creating a new session.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Preferred initial working directory; ignored if it does not exist.
    pub working_dir: Option<PathBuf>,
    /// Maximum number of history entries kept (unbounded when `None`).
    pub history_limit: Option<usize>,
}

impl SessionConfig {
    /// Resolve the initial working directory for a new session.
    ///
    /// Preference order: configured directory, host current directory,
    /// platform root. The result is absolute and lexically normalized.
    pub fn initial_working_dir(&self) -> PathBuf {
        let dir = self
            .working_dir
            .as_ref()
            .filter(|dir| dir.is_dir())
            .map(|dir| match std::env::current_dir() {
                Ok(cwd) if dir.is_relative() => cwd.join(dir),
                _ => dir.clone(),
            })
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(platform_root);
        normalize(&dir)
    }
}

/// A client's logical shell session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Unique identifier.
    pub id: SessionId,
    /// Working directory and history.
    pub state: SessionState,
    /// Time when session was created.
    pub created_at: Instant,
    /// Time of last activity.
    pub last_activity: Instant,
    /// Output channel of the originating connection, if any.
    outbox: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl Session {
    /// Create a new session with the given ID and configuration.
    pub fn new(id: SessionId, config: &SessionConfig) -> Self {
        let now = Instant::now();
        Self {
            id,
            state: SessionState::new(config.initial_working_dir(), config.history_limit),
            created_at: now,
            last_activity: now,
            outbox: None,
        }
    }

    /// Update the last activity timestamp.
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Time since the session was created.
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Get the idle duration since last activity.
    pub fn idle_duration(&self) -> Duration {
        self.last_activity.elapsed()
    }

    /// Sender for pushing events to the session's connection.
    pub fn outbox(&self) -> Option<&mpsc::UnboundedSender<SessionEvent>> {
        self.outbox.as_ref()
    }
}

/// Process-wide registry of live sessions.
///
/// Entries live in a sharded map: mutations of one session hold only that
/// entry's shard lock, so work on different sessions does not serialize on
/// a single global lock. No operation suspends.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<SessionId, Session>,
}

impl SessionStore {
    /// Create a new empty session store.
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Create and register a new session, returning its ID.
    pub fn create(&self, config: SessionConfig) -> SessionId {
        let id = SessionId::new();
        let session = Session::new(id, &config);
        info!(session = %id, cwd = %session.state.working_dir().display(), "session created");
        self.sessions.insert(id, session);
        id
    }

    /// Create a session with an output channel for pushed events.
    pub fn open(&self, config: SessionConfig) -> (SessionId, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = SessionId::new();
        let mut session = Session::new(id, &config);
        session.outbox = Some(tx);
        info!(session = %id, cwd = %session.state.working_dir().display(), "session opened");
        self.sessions.insert(id, session);
        (id, rx)
    }

    /// Get a snapshot of the session with the given ID.
    pub fn get(&self, id: &SessionId) -> Result<Session> {
        self.sessions
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ShellRelayError::SessionNotFound(id.to_string()))
    }

    /// Current working directory of a session.
    pub fn working_dir(&self, id: &SessionId) -> Result<PathBuf> {
        self.read(id, |s| s.state.working_dir().to_path_buf())
    }

    /// Copy of a session's history, oldest first.
    pub fn history(&self, id: &SessionId) -> Result<Vec<HistoryEntry>> {
        self.read(id, |s| s.state.history().cloned().collect())
    }

    /// Read from a session without cloning all of it.
    pub fn read<F, R>(&self, id: &SessionId, f: F) -> Result<R>
    where
        F: FnOnce(&Session) -> R,
    {
        self.sessions
            .get(id)
            .map(|entry| f(entry.value()))
            .ok_or_else(|| ShellRelayError::SessionNotFound(id.to_string()))
    }

    /// Check if a session exists.
    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.contains_key(id)
    }

    /// Update a session using a closure.
    ///
    /// The closure runs while the entry is exclusively locked, so everything
    /// it changes is applied atomically with respect to other updates of the
    /// same session. Returns an error if the session doesn't exist.
    pub fn update<F, R>(&self, id: &SessionId, f: F) -> Result<R>
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut entry = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| ShellRelayError::SessionNotFound(id.to_string()))?;
        let session = entry.value_mut();
        session.touch();
        Ok(f(session))
    }

    /// Remove a session from the store.
    ///
    /// Idempotent: returns `false` if the session was already gone.
    pub fn destroy(&self, id: &SessionId) -> bool {
        match self.sessions.remove(id) {
            Some(_) => {
                info!(session = %id, "session destroyed");
                true
            }
            None => {
                debug!(session = %id, "destroy on unknown session ignored");
                false
            }
        }
    }

    /// Get the number of sessions in the store.
    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    /// List all session IDs.
    pub fn list_ids(&self) -> Vec<SessionId> {
        self.sessions.iter().map(|entry| *entry.key()).collect()
    }

    /// Snapshots of all sessions.
    pub fn list(&self) -> Vec<Session> {
        self.sessions.iter().map(|entry| entry.value().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::CommandResult;
    use std::path::Path;

    #[test]
    fn test_create_session() {
        let store = SessionStore::new();
        let id = store.create(SessionConfig::default());

        assert!(store.contains(&id));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_default_working_dir_is_current_dir() {
        let store = SessionStore::new();
        let id = store.create(SessionConfig::default());

        let cwd = store.working_dir(&id).unwrap();
        assert_eq!(cwd, std::env::current_dir().unwrap());
        assert!(store.history(&id).unwrap().is_empty());
    }

    #[test]
    fn test_configured_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new();
        let id = store.create(SessionConfig {
            working_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        });
        assert_eq!(store.working_dir(&id).unwrap(), dir.path());
    }

    #[cfg(unix)]
    #[test]
    fn test_configured_working_dir_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("a")).unwrap();
        std::fs::create_dir(dir.path().join("b")).unwrap();
        let config = SessionConfig {
            working_dir: Some(dir.path().join("a/../b/.")),
            ..Default::default()
        };
        assert_eq!(config.initial_working_dir(), dir.path().join("b"));
    }

    #[test]
    fn test_missing_configured_dir_falls_back() {
        let config = SessionConfig {
            working_dir: Some(PathBuf::from("/no/such/dir/anywhere")),
            ..Default::default()
        };
        let dir = config.initial_working_dir();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_get_nonexistent() {
        let store = SessionStore::new();
        let err = store.get(&SessionId::new()).unwrap_err();
        assert!(matches!(err, ShellRelayError::SessionNotFound(_)));
    }

    #[test]
    fn test_update_session() {
        let store = SessionStore::new();
        let id = store.create(SessionConfig::default());

        store
            .update(&id, |s| s.state.set_working_dir("/tmp"))
            .unwrap();

        assert_eq!(store.working_dir(&id).unwrap(), Path::new("/tmp"));
    }

    #[test]
    fn test_update_returns_closure_value() {
        let store = SessionStore::new();
        let id = store.create(SessionConfig::default());

        let len = store
            .update(&id, |s| {
                s.state.record(HistoryEntry::new(
                    "ls",
                    CommandResult::from_output(b"", b"", 0, Path::new("/")),
                ));
                s.state.history_len()
            })
            .unwrap();
        assert_eq!(len, 1);
    }

    #[test]
    fn test_update_nonexistent() {
        let store = SessionStore::new();
        assert!(store.update(&SessionId::new(), |_| {}).is_err());
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let store = SessionStore::new();
        let id = store.create(SessionConfig::default());

        assert!(store.destroy(&id));
        assert!(!store.destroy(&id));
        assert!(!store.destroy(&SessionId::new()));
        assert!(!store.contains(&id));
        assert_eq!(store.count(), 0);
        assert!(store.get(&id).is_err());
    }

    #[test]
    fn test_open_attaches_outbox() {
        let store = SessionStore::new();
        let (id, mut rx) = store.open(SessionConfig::default());

        let outbox = store.read(&id, |s| s.outbox().cloned()).unwrap().unwrap();
        outbox.send(SessionEvent::Pong).unwrap();
        assert!(matches!(rx.try_recv(), Ok(SessionEvent::Pong)));

        store.destroy(&id);
        drop(outbox);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_list_ids() {
        let store = SessionStore::new();
        let id1 = store.create(SessionConfig::default());
        let id2 = store.create(SessionConfig::default());
        let id3 = store.create(SessionConfig::default());

        let ids = store.list_ids();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&id1));
        assert!(ids.contains(&id2));
        assert!(ids.contains(&id3));
        assert_eq!(store.list().len(), 3);
    }

    #[test]
    fn test_concurrent_access() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(SessionStore::new());
        let mut handles = vec![];

        for _ in 0..100 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                let id = store.create(SessionConfig::default());
                store.update(&id, |s| s.state.set_working_dir("/tmp")).unwrap();
                id
            }));
        }

        let ids: Vec<SessionId> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 100);
        assert_eq!(store.count(), 100);
    }

    #[test]
    fn test_concurrent_updates_same_session_are_not_lost() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(SessionStore::new());
        let id = store.create(SessionConfig::default());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store
                        .update(&id, |s| {
                            s.state.record(HistoryEntry::new(
                                format!("cmd {i}"),
                                CommandResult::from_output(b"", b"", 0, Path::new("/")),
                            ))
                        })
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.history(&id).unwrap().len(), 16);
    }
}
