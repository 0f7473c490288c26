//! HTTP and WebSocket transport for shell-relay.
//!
//! A thin adapter over [`CommandDispatcher`](crate::dispatch::CommandDispatcher):
//! requests are decoded, handed to the dispatcher or the session store, and
//! the results are encoded back.
//!
//! ## Endpoints
//!
//! ### Health & Info
//! - `GET /health` - Health check
//! - `GET /api/v1/` - API information
//! - `GET /api/v1/system/info` - Host information
//!
//! ### Sessions
//! - `GET /api/v1/sessions` - List all sessions
//! - `POST /api/v1/sessions` - Create a new session
//! - `GET /api/v1/sessions/{id}` - Get session status
//! - `DELETE /api/v1/sessions/{id}` - Delete a session
//! - `GET /api/v1/sessions/{id}/history` - Command history
//! - `POST /api/v1/sessions/{id}/execute` - Execute command in session
//! - `GET /api/v1/sessions/{id}/system/info` - Host information with the session directory
//!
//! ### Stateless Execution and Advice
//! - `POST /api/v1/execute` - Execute command without a session
//! - `POST /api/v1/ai/analyze` - Command advice
//!
//! ### WebSocket
//! - `WS /api/v1/ws` - One connection, one session
//!
//! ## Example
//!
//! ```no_run
//! use shell_relay::api::{serve, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> shell_relay::Result<()> {
//!     let config = ServerConfig::new("127.0.0.1", 8001);
//!     serve(config).await
//! }
//! ```

pub mod handlers;
pub mod router;
pub mod types;
pub mod websocket;

pub use handlers::AppState;
pub use router::{create_router, create_router_with_state, serve, serve_with_state, ServerConfig};
pub use types::{
    AnalyzeResponse, ClientMessage, CreateSessionRequest, CreateSessionResponse, ErrorResponse,
    ExecuteRequest, HistoryResponse, ListSessionsResponse, SessionCommandRequest,
    SessionStatusResponse,
};
