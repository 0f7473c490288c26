//! Execution result types.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Exit code reported when the shell process could not be started.
pub const EXIT_CODE_SPAWN_FAILURE: i32 = -1;

/// Exit code reported when a configured timeout killed the command.
pub const EXIT_CODE_TIMEOUT: i32 = 124;

/// Result of running one command through the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    /// True iff the exit code is 0.
    pub success: bool,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
    /// Process exit code; `-1` means the process never started.
    pub exit_code: i32,
    /// Directory the command ran in, or the session's directory after a
    /// dispatched command.
    pub working_directory: String,
    /// Whether a configured timeout killed the command.
    #[serde(default)]
    pub timed_out: bool,
    /// Set when a `cd` target could not be resolved and the session
    /// directory was left unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory_error: Option<String>,
}

impl CommandResult {
    /// Build a result from captured process output.
    pub fn from_output(stdout: &[u8], stderr: &[u8], exit_code: i32, working_dir: &Path) -> Self {
        Self {
            success: exit_code == 0,
            stdout: String::from_utf8_lossy(stdout).into_owned(),
            stderr: String::from_utf8_lossy(stderr).into_owned(),
            exit_code,
            working_directory: display_path(working_dir),
            timed_out: false,
            directory_error: None,
        }
    }

    /// Result for a process that could not be started.
    pub fn spawn_failure(message: impl Into<String>, working_dir: &Path) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: message.into(),
            exit_code: EXIT_CODE_SPAWN_FAILURE,
            working_directory: display_path(working_dir),
            timed_out: false,
            directory_error: None,
        }
    }

    /// Result for a command killed by the execution timeout.
    pub fn timeout(limit_secs: u64, working_dir: &Path) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: format!("command timed out after {limit_secs}s"),
            exit_code: EXIT_CODE_TIMEOUT,
            working_directory: display_path(working_dir),
            timed_out: true,
            directory_error: None,
        }
    }

    /// Replace the reported working directory.
    pub fn with_working_directory(mut self, dir: &Path) -> Self {
        self.working_directory = display_path(dir);
        self
    }

    /// Attach a directory resolution failure.
    pub fn with_directory_error(mut self, message: impl Into<String>) -> Self {
        self.directory_error = Some(message.into());
        self
    }

    /// Whether the process could not be started at all.
    pub fn failed_to_start(&self) -> bool {
        self.exit_code == EXIT_CODE_SPAWN_FAILURE
    }
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
