//! Command dispatch for sessions.
//!
//! The dispatcher resolves a session's working directory, runs the command
//! through the [`ShellExecutor`](crate::execution::ShellExecutor), tracks
//! `cd` commands, appends history, and returns or pushes the result.

mod directory;
mod dispatcher;
mod event;

pub(crate) use directory::normalize;
pub use directory::{parse_cd_target, resolve_cd_target};
pub use dispatcher::CommandDispatcher;
pub(crate) use dispatcher::deliver;
pub use event::SessionEvent;
