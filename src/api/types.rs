//! API request and response types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::session::{HistoryEntry, Session, SessionId};

/// Request to create a new session.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CreateSessionRequest {
    /// Initial working directory.
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

/// Response for session creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionResponse {
    /// The assigned session ID.
    pub session_id: SessionId,
    /// The session's initial working directory.
    pub working_directory: String,
}

/// Response for session status query.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatusResponse {
    /// Session ID.
    pub session_id: SessionId,
    /// Current working directory.
    pub working_directory: String,
    /// Number of recorded commands.
    pub history_len: usize,
    /// Last command, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_command: Option<String>,
    /// Exit code of the last command, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_exit_code: Option<i32>,
    /// Time since the session was created, in seconds.
    pub age_seconds: f64,
    /// Idle duration in seconds.
    pub idle_seconds: f64,
}

impl SessionStatusResponse {
    pub fn from_session(session: &Session) -> Self {
        let last = session.state.last_entry();
        Self {
            session_id: session.id,
            working_directory: session.state.working_dir().to_string_lossy().into_owned(),
            history_len: session.state.history_len(),
            last_command: last.map(|e| e.command.clone()),
            last_exit_code: last.map(|e| e.result.exit_code),
            age_seconds: session.age().as_secs_f64(),
            idle_seconds: session.idle_duration().as_secs_f64(),
        }
    }
}

/// List sessions response.
#[derive(Debug, Clone, Serialize)]
pub struct ListSessionsResponse {
    /// Total number of sessions.
    pub count: usize,
    /// Session summaries.
    pub sessions: Vec<SessionStatusResponse>,
}

/// Session history response.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub session_id: SessionId,
    pub entries: Vec<HistoryEntry>,
}

/// Request to run a command in a session.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionCommandRequest {
    /// The command line to execute.
    pub command: String,
}

/// Stateless execution request.
///
/// `session_id` is accepted for correlation only; the command runs in
/// `working_directory` and no session state is read or written.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteRequest {
    /// The command line to execute.
    pub command: String,
    /// Correlating session, if any.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Directory to run in (defaults to the server's current directory).
    #[serde(default, alias = "working_dir")]
    pub working_directory: Option<PathBuf>,
}

/// Advice response.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: String,
}

/// Generic API error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "SESSION_NOT_FOUND").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn session_not_found(id: &str) -> Self {
        Self::new("SESSION_NOT_FOUND", format!("Session '{}' not found", id))
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

/// Messages a WebSocket client may send.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Run a command in the connection's session.
    ExecuteCommand { command: String },
    /// Ask for host information.
    GetSystemInfo,
    /// Ask for advice.
    AiAnalyze {
        message: String,
        #[serde(default)]
        context: String,
        #[serde(default, alias = "api_key")]
        credential: Option<String>,
        #[serde(default)]
        provider: Option<String>,
    },
    /// Connection health check.
    Ping,
}
