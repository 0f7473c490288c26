//! Routing of session commands through execution and state tracking.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info_span, Instrument};

use super::directory::{parse_cd_target, resolve_cd_target};
use super::event::SessionEvent;
use crate::execution::{CommandResult, ShellExecutor};
use crate::session::{HistoryEntry, SessionId, SessionStore};
use crate::Result;

/// Dispatches commands on behalf of sessions.
///
/// Both the request/response path ([`dispatch`](Self::dispatch)) and the
/// push path ([`submit`](Self::submit)) go through the same working
/// directory logic. Cloning is cheap; clones share the store and executor.
#[derive(Clone)]
pub struct CommandDispatcher {
    store: Arc<SessionStore>,
    executor: Arc<ShellExecutor>,
}

impl CommandDispatcher {
    /// Create a dispatcher over a store and executor.
    pub fn new(store: Arc<SessionStore>, executor: Arc<ShellExecutor>) -> Self {
        Self { store, executor }
    }

    /// The session store.
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// The shell executor.
    pub fn executor(&self) -> &Arc<ShellExecutor> {
        &self.executor
    }

    /// Run `command` in the session's working directory and record it.
    ///
    /// A `cd` moves the session only if the shell reported success and the
    /// resolved directory exists; a `cd` to a missing directory leaves the
    /// session where it was and sets `directory_error` on the result. The
    /// directory update and the history append happen in one atomic
    /// session update, so concurrent commands on one session never tear.
    ///
    /// # Errors
    ///
    /// [`SessionNotFound`](crate::ShellRelayError::SessionNotFound) if the
    /// session is unknown (nothing is executed), or if it was destroyed
    /// while the command was running (nothing is recorded).
    pub async fn dispatch(&self, id: &SessionId, command: &str) -> Result<CommandResult> {
        let cwd = self.store.working_dir(id)?;
        let cd_target = parse_cd_target(command).map(|target| resolve_cd_target(&cwd, &target));

        debug!(session = %id, cwd = %cwd.display(), command, "dispatching command");
        let result = self.executor.execute(command, &cwd).await;

        let target_state = cd_target.map(|target| {
            let exists = target.is_dir();
            (target, exists)
        });

        let entry_command = command.to_string();
        let recorded = self.store.update(id, move |session| {
            let mut result = result;
            match target_state {
                Some((target, true)) if result.success => session.state.set_working_dir(target),
                Some((target, false)) => {
                    result = result
                        .with_directory_error(format!("directory not found: {}", target.display()));
                }
                _ => {}
            }
            let result = result.with_working_directory(session.state.working_dir());
            session.state.record(HistoryEntry::new(entry_command, result.clone()));
            result
        });

        if recorded.is_err() {
            debug!(session = %id, command, "session closed before command finished");
        }
        recorded
    }

    /// Submit a command whose result is pushed to the session's outbox.
    ///
    /// Fails immediately if the session does not exist. Otherwise the
    /// command runs on its own task, detached from the caller, and exactly
    /// one `command_result` or `command_error` event is emitted. Events for
    /// a connection that has gone away are dropped.
    pub fn submit(&self, id: SessionId, command: impl Into<String>) -> Result<JoinHandle<()>> {
        let outbox = self.store.read(&id, |s| s.outbox().cloned())?;
        let command = command.into();
        let dispatcher = self.clone();
        let span = info_span!("submit", session = %id);

        Ok(tokio::spawn(
            async move {
                let event = match dispatcher.dispatch(&id, &command).await {
                    Ok(result) => SessionEvent::CommandResult {
                        command,
                        result,
                        session_id: id,
                    },
                    Err(e) => SessionEvent::CommandError {
                        code: if e.is_not_found() {
                            "SESSION_NOT_FOUND".to_string()
                        } else {
                            "DISPATCH_ERROR".to_string()
                        },
                        error: e.to_string(),
                        command,
                    },
                };
                deliver(outbox.as_ref(), event);
            }
            .instrument(span),
        ))
    }

    /// Execute a command without reading or recording session state.
    pub async fn execute_stateless(&self, command: &str, working_dir: &Path) -> CommandResult {
        self.executor.execute(command, working_dir).await
    }
}

/// Send an event, ignoring a closed or missing channel.
pub(crate) fn deliver(outbox: Option<&mpsc::UnboundedSender<SessionEvent>>, event: SessionEvent) {
    match outbox {
        Some(tx) => {
            if tx.send(event).is_err() {
                debug!("dropping event for closed connection");
            }
        }
        None => debug!("session has no output channel, dropping event"),
    }
}
