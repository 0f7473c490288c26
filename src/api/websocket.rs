//! WebSocket handler: one connection, one session.
//!
//! Opening the socket creates a session; every inbound `execute_command`
//! is dispatched on its own task and answered with a `command_result`
//! event; closing the socket destroys the session.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::handlers::AppState;
use super::types::ClientMessage;
use crate::advice::AdviceRequest;
use crate::dispatch::{deliver, SessionEvent};
use crate::session::SessionId;
use crate::system::SystemInfo;

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle a WebSocket connection for its whole lifetime.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (id, mut events) = state.store.open(state.session_defaults.clone());
    let outbox = state
        .store
        .read(&id, |s| s.outbox().cloned())
        .ok()
        .flatten();

    let (mut sink, mut stream) = socket.split();

    let working_directory = state
        .store
        .working_dir(&id)
        .map(|dir| dir.to_string_lossy().into_owned())
        .unwrap_or_default();
    deliver(
        outbox.as_ref(),
        SessionEvent::SessionCreated {
            session_id: id,
            working_directory,
        },
    );

    // Forward pushed events to the socket.
    let forwarder = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    warn!("failed to encode event: {}", e);
                    continue;
                }
            };
            if sink.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(msg) = stream.next().await {
        let text = match msg {
            Ok(Message::Text(text)) => text.as_str().to_owned(),
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                debug!(session = %id, "websocket receive error: {}", e);
                break;
            }
        };

        match serde_json::from_str::<ClientMessage>(&text) {
            Ok(message) => handle_message(&state, id, outbox.as_ref(), message),
            Err(e) => deliver(outbox.as_ref(), SessionEvent::error("PARSE_ERROR", e.to_string())),
        }
    }

    state.store.destroy(&id);
    forwarder.abort();
}

fn handle_message(
    state: &AppState,
    id: SessionId,
    outbox: Option<&mpsc::UnboundedSender<SessionEvent>>,
    message: ClientMessage,
) {
    match message {
        ClientMessage::ExecuteCommand { command } => {
            if let Err(e) = state.dispatcher.submit(id, command.clone()) {
                deliver(
                    outbox,
                    SessionEvent::CommandError {
                        command,
                        error: e.to_string(),
                        code: "SESSION_NOT_FOUND".to_string(),
                    },
                );
            }
        }
        ClientMessage::GetSystemInfo => {
            let mut info = SystemInfo::collect();
            if let Ok(dir) = state.store.working_dir(&id) {
                info = info.with_current_directory(dir.to_string_lossy());
            }
            deliver(outbox, SessionEvent::SystemInfo(info));
        }
        ClientMessage::AiAnalyze {
            message,
            context,
            credential,
            provider,
        } => {
            let request = AdviceRequest {
                message,
                context,
                credential,
                provider,
            };
            let analysis = state.advisor.advise(&request);
            deliver(
                outbox,
                SessionEvent::AiResponse {
                    message: request.message,
                    analysis,
                    timestamp: Utc::now().to_rfc3339(),
                },
            );
        }
        ClientMessage::Ping => deliver(outbox, SessionEvent::Pong),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionConfig;

    #[test]
    fn test_ping_replies_pong() {
        let state = AppState::new();
        let (id, mut rx) = state.store.open(SessionConfig::default());
        let outbox = state.store.read(&id, |s| s.outbox().cloned()).unwrap();

        handle_message(&state, id, outbox.as_ref(), ClientMessage::Ping);
        assert!(matches!(rx.try_recv(), Ok(SessionEvent::Pong)));
    }

    #[test]
    fn test_analyze_without_credential() {
        let state = AppState::new();
        let (id, mut rx) = state.store.open(SessionConfig::default());
        let outbox = state.store.read(&id, |s| s.outbox().cloned()).unwrap();

        let message = ClientMessage::AiAnalyze {
            message: "git status".into(),
            context: String::new(),
            credential: None,
            provider: None,
        };
        handle_message(&state, id, outbox.as_ref(), message);

        match rx.try_recv() {
            Ok(SessionEvent::AiResponse { analysis, .. }) => assert!(analysis.contains("API key")),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_system_info_includes_session_dir() {
        let state = AppState::new();
        let (id, mut rx) = state.store.open(SessionConfig::default());
        let outbox = state.store.read(&id, |s| s.outbox().cloned()).unwrap();

        handle_message(&state, id, outbox.as_ref(), ClientMessage::GetSystemInfo);

        match rx.try_recv() {
            Ok(SessionEvent::SystemInfo(info)) => assert!(info.current_directory.is_some()),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_execute_on_destroyed_session_reports_error() {
        let state = AppState::new();
        let (id, mut rx) = state.store.open(SessionConfig::default());
        let outbox = state.store.read(&id, |s| s.outbox().cloned()).unwrap();
        state.store.destroy(&id);

        handle_message(
            &state,
            id,
            outbox.as_ref(),
            ClientMessage::ExecuteCommand {
                command: "echo hi".into(),
            },
        );

        match rx.recv().await {
            Some(SessionEvent::CommandError { code, .. }) => assert_eq!(code, "SESSION_NOT_FOUND"),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
