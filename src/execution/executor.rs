//! Command execution engine.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::result::{CommandResult, EXIT_CODE_SPAWN_FAILURE};
use super::shell::{platform_root, Shell};

/// Runs single command lines through the platform shell.
///
/// The executor holds no per-call state: the working directory is handed to
/// each child at spawn time, so any number of executions may run
/// concurrently without affecting one another or the host process.
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor {
    shell: Shell,
    timeout: Option<Duration>,
}

impl ShellExecutor {
    /// Create an executor using the platform shell and no timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific shell.
    pub fn with_shell(mut self, shell: Shell) -> Self {
        self.shell = shell;
        self
    }

    /// Kill commands that run longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The shell used for execution.
    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    /// The configured timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Execute `command_line` in `working_dir`.
    ///
    /// Never fails: spawn errors, wait errors and timeouts all come back as
    /// an unsuccessful [`CommandResult`]. If `working_dir` is not an existing
    /// directory the command runs in a fallback directory, which is what the
    /// result reports.
    pub async fn execute(&self, command_line: &str, working_dir: &Path) -> CommandResult {
        let dir = resolve_execution_dir(working_dir);
        let start = Instant::now();

        let mut cmd = self.shell.command(command_line, &dir);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Only a timed-out command is ever dropped before it exits.
            .kill_on_drop(self.timeout.is_some());

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(shell = %self.shell, dir = %dir.display(), "failed to spawn shell: {}", e);
                return CommandResult::spawn_failure(
                    format!("failed to start {}: {}", self.shell, e),
                    &dir,
                );
            }
        };

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(output) => output,
                Err(_) => {
                    warn!(command = command_line, "command timed out after {:?}", limit);
                    return CommandResult::timeout(limit.as_secs(), &dir);
                }
            },
            None => child.wait_with_output().await,
        };

        match output {
            Ok(output) => {
                let exit_code = exit_code_of(output.status);
                debug!(
                    command = command_line,
                    exit_code,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "command finished"
                );
                CommandResult::from_output(&output.stdout, &output.stderr, exit_code, &dir)
            }
            Err(e) => CommandResult::spawn_failure(format!("failed to collect output: {e}"), &dir),
        }
    }
}

/// Pick the directory a command will actually run in.
///
/// Returns `requested` when it is an existing directory, otherwise the host
/// process's current directory, otherwise the platform root.
pub fn resolve_execution_dir(requested: &Path) -> PathBuf {
    if requested.is_dir() {
        return requested.to_path_buf();
    }
    let fallback = std::env::current_dir()
        .ok()
        .filter(|dir| dir.is_dir())
        .unwrap_or_else(platform_root);
    warn!(
        requested = %requested.display(),
        fallback = %fallback.display(),
        "working directory does not exist, using fallback"
    );
    fallback
}

#[cfg(unix)]
fn exit_code_of(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(EXIT_CODE_SPAWN_FAILURE)
}

#[cfg(not(unix))]
fn exit_code_of(status: ExitStatus) -> i32 {
    status.code().unwrap_or(EXIT_CODE_SPAWN_FAILURE)
}
