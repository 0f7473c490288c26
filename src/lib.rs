//! # shell-relay
//!
//! Multi-session remote shell command relay.
//!
//! Clients open sessions, submit shell command lines, and receive the
//! captured output. Each session remembers its own working directory and
//! command history, so `cd` in one session never affects another and never
//! touches the server process's own directory.
//!
//! ## Features
//!
//! - **Isolated sessions**: per-session working directory and history
//! - **Concurrent dispatch**: commands run on their own tasks; each session's
//!   state is updated atomically
//! - **Directory tracking**: `cd <dir>` updates the session directory
//!   only when the shell succeeded and the target exists
//! - **HTTP and WebSocket transport**: axum-based adapter
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use shell_relay::{CommandDispatcher, SessionConfig, SessionStore, ShellExecutor};
//!
//! #[tokio::main]
//! async fn main() -> shell_relay::Result<()> {
//!     shell_relay::logging::try_init().ok();
//!
//!     let store = Arc::new(SessionStore::new());
//!     let dispatcher = CommandDispatcher::new(Arc::clone(&store), Arc::new(ShellExecutor::new()));
//!
//!     let session_id = store.create(SessionConfig::default());
//!     dispatcher.dispatch(&session_id, "cd ..").await?;
//!     let result = dispatcher.dispatch(&session_id, "pwd").await?;
//!     println!("{}", result.stdout);
//!
//!     Ok(())
//! }
//! ```

pub mod advice;
pub mod api;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod execution;
pub mod logging;
pub mod session;
pub mod system;

pub use advice::{AdviceRequest, Advisor, KeywordAdvisor};
pub use config::Config;
pub use dispatch::{CommandDispatcher, SessionEvent};
pub use error::{Result, ShellRelayError};
pub use execution::{CommandResult, Shell, ShellExecutor};
pub use session::{HistoryEntry, Session, SessionConfig, SessionId, SessionState, SessionStore};
pub use system::SystemInfo;
