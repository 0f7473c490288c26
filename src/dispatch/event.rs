//! Events pushed to a session's connection.

use serde::Serialize;

use crate::execution::CommandResult;
use crate::session::SessionId;
use crate::system::SystemInfo;

/// Outbound event delivered on a session's output channel.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The connection's session is ready.
    SessionCreated {
        session_id: SessionId,
        working_directory: String,
    },
    /// A submitted command finished.
    CommandResult {
        command: String,
        result: CommandResult,
        session_id: SessionId,
    },
    /// A submitted command could not be dispatched.
    CommandError {
        command: String,
        error: String,
        code: String,
    },
    /// Host information.
    SystemInfo(SystemInfo),
    /// Advice for an analyzed command.
    AiResponse {
        message: String,
        analysis: String,
        timestamp: String,
    },
    /// Malformed or unsupported request.
    Error { code: String, message: String },
    /// Reply to a ping.
    Pong,
}

impl SessionEvent {
    /// Error event with a code and message.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }
}
