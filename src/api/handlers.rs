//! REST API handlers.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::types::{
    AnalyzeResponse, CreateSessionRequest, CreateSessionResponse, ErrorResponse, ExecuteRequest,
    HistoryResponse, ListSessionsResponse, SessionCommandRequest, SessionStatusResponse,
};
use crate::advice::{AdviceRequest, Advisor, KeywordAdvisor};
use crate::dispatch::CommandDispatcher;
use crate::error::ShellRelayError;
use crate::execution::{CommandResult, ShellExecutor};
use crate::session::{SessionConfig, SessionId, SessionStore};
use crate::system::SystemInfo;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SessionStore>,
    pub dispatcher: CommandDispatcher,
    pub advisor: Arc<dyn Advisor>,
    pub session_defaults: SessionConfig,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_parts(ShellExecutor::new(), SessionConfig::default())
    }

    /// Build state around a configured executor and session defaults.
    pub fn with_parts(executor: ShellExecutor, session_defaults: SessionConfig) -> Self {
        let store = Arc::new(SessionStore::new());
        let dispatcher = CommandDispatcher::new(Arc::clone(&store), Arc::new(executor));
        Self {
            store,
            dispatcher,
            advisor: Arc::new(KeywordAdvisor),
            session_defaults,
        }
    }

    /// Replace the advice backend.
    pub fn with_advisor(mut self, advisor: Arc<dyn Advisor>) -> Self {
        self.advisor = advisor;
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(e: ShellRelayError, raw_id: &str) -> ApiError {
    if e.is_not_found() {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::session_not_found(raw_id)),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal_error(e.to_string())),
        )
    }
}

fn parse_id(raw: &str) -> Result<SessionId, ApiError> {
    raw.parse().map_err(|e| error_response(e, raw))
}

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}

/// API information endpoint.
pub async fn api_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "shell-relay",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

/// List all sessions.
pub async fn list_sessions(State(state): State<AppState>) -> Json<ListSessionsResponse> {
    let sessions: Vec<_> = state
        .store
        .list()
        .iter()
        .map(SessionStatusResponse::from_session)
        .collect();

    Json(ListSessionsResponse {
        count: sessions.len(),
        sessions,
    })
}

/// Create a new session.
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), ApiError> {
    let mut config = state.session_defaults.clone();
    if req.working_dir.is_some() {
        config.working_dir = req.working_dir;
    }

    let session_id = state.store.create(config);
    let working_directory = state
        .store
        .working_dir(&session_id)
        .map_err(|e| error_response(e, &session_id.to_string()))?
        .to_string_lossy()
        .into_owned();

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            working_directory,
        }),
    ))
}

/// Get session status.
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionStatusResponse>, ApiError> {
    let id = parse_id(&session_id)?;
    let session = state
        .store
        .get(&id)
        .map_err(|e| error_response(e, &session_id))?;

    Ok(Json(SessionStatusResponse::from_session(&session)))
}

/// Get a session's command history.
pub async fn get_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let id = parse_id(&session_id)?;
    let entries = state
        .store
        .history(&id)
        .map_err(|e| error_response(e, &session_id))?;

    Ok(Json(HistoryResponse {
        session_id: id,
        entries,
    }))
}

/// Delete a session. Deleting an unknown session is not an error.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> StatusCode {
    if let Ok(id) = session_id.parse::<SessionId>() {
        state.store.destroy(&id);
    }
    StatusCode::NO_CONTENT
}

/// Execute a command in a session.
pub async fn execute_in_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<SessionCommandRequest>,
) -> Result<Json<CommandResult>, ApiError> {
    let id = parse_id(&session_id)?;
    let result = state
        .dispatcher
        .dispatch(&id, &req.command)
        .await
        .map_err(|e| error_response(e, &session_id))?;

    Ok(Json(result))
}

/// Execute a command without touching session state.
pub async fn execute_stateless(
    State(state): State<AppState>,
    Json(req): Json<ExecuteRequest>,
) -> Json<CommandResult> {
    let base = std::env::current_dir().unwrap_or_else(|_| crate::execution::platform_root());
    let dir = match req.working_directory {
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => base.join(dir),
        None => base,
    };
    tracing::debug!(session = ?req.session_id, dir = %dir.display(), "stateless execute");

    Json(state.dispatcher.execute_stateless(&req.command, &dir).await)
}

/// Host information.
pub async fn system_info() -> Json<SystemInfo> {
    Json(SystemInfo::collect())
}

/// Host information including a session's working directory.
pub async fn session_system_info(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SystemInfo>, ApiError> {
    let id = parse_id(&session_id)?;
    let dir: PathBuf = state
        .store
        .working_dir(&id)
        .map_err(|e| error_response(e, &session_id))?;

    Ok(Json(
        SystemInfo::collect().with_current_directory(dir.to_string_lossy()),
    ))
}

/// Advice for a command or its output.
pub async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AdviceRequest>,
) -> Json<AnalyzeResponse> {
    Json(AnalyzeResponse {
        analysis: state.advisor.advise(&req),
    })
}
