//! Error types for shell-relay.

use thiserror::Error;

/// Main error type for shell-relay operations.
///
/// Failures of the executed command itself never show up here; they are
/// carried inside [`CommandResult`](crate::execution::CommandResult).
#[derive(Error, Debug)]
pub enum ShellRelayError {
    /// Session with the given ID was not found (unknown or destroyed).
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// A session identifier could not be parsed.
    #[error("invalid session id: {0}")]
    InvalidSessionId(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ShellRelayError {
    /// Whether this error means the session does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SessionNotFound(_) | Self::InvalidSessionId(_))
    }
}

/// Convenience Result type for shell-relay operations.
pub type Result<T> = std::result::Result<T, ShellRelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_not_found_display() {
        let err = ShellRelayError::SessionNotFound("4f1c".into());
        assert!(err.to_string().contains("4f1c"));
        assert!(err.to_string().contains("not found"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_session_id_counts_as_not_found() {
        let err = ShellRelayError::InvalidSessionId("garbage".into());
        assert!(err.is_not_found());
        assert!(err.to_string().contains("garbage"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ShellRelayError = io_err.into();
        assert!(matches!(err, ShellRelayError::Io(_)));
        assert!(err.to_string().contains("I/O error"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err: ShellRelayError = json_err.into();
        assert!(matches!(err, ShellRelayError::Json(_)));
    }
}
