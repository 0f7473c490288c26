//! Session management module.
//!
//! This module provides session identification, per-session shell state
//! (working directory and history), and the concurrent session store.

mod id;
mod state;
mod store;

pub use id::SessionId;
pub use state::{HistoryEntry, SessionState};
pub use store::{Session, SessionConfig, SessionStore};
