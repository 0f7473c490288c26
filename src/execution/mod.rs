//! Command execution engine.
//!
//! This module runs one command line per call through the host shell:
//! - Platform shell selection (`/bin/sh -c`, `cmd.exe /C`, PowerShell)
//! - Per-call working directory passed at spawn time
//! - Full stdout/stderr capture with lossy decoding
//! - Optional timeout
//!
//! # Example
//!
//! ```no_run
//! use shell_relay::execution::ShellExecutor;
//!
//! # async fn run() {
//! let executor = ShellExecutor::new();
//! let result = executor.execute("echo hello", std::path::Path::new("/tmp")).await;
//! println!("exit {}: {}", result.exit_code, result.stdout);
//! # }
//! ```

mod executor;
mod result;
mod shell;

pub use executor::{resolve_execution_dir, ShellExecutor};
pub use result::{CommandResult, EXIT_CODE_SPAWN_FAILURE, EXIT_CODE_TIMEOUT};
pub use shell::{platform_root, Shell};
