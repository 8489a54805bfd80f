//! WebSocket endpoint delivering realtime events.
//!
//! The socket authenticates with the same session cookie as the HTTP API. Clients may
//! send `{"type":"ping"}` (or a bare `ping`) and receive `{"type":"pong"}`. Every
//! other inbound frame is ignored.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tower_sessions::Session;

use crate::server::{
    error::AppError,
    middleware::auth::AuthGuard,
    push::{PushEvent, PushHub},
    state::AppState,
};

/// Tag for grouping the realtime endpoint in OpenAPI documentation
pub static WS_TAG: &str = "realtime";

#[derive(Deserialize)]
struct ClientFrame {
    #[serde(rename = "type")]
    kind: String,
}

#[utoipa::path(
    get,
    path = "/api/ws",
    tag = WS_TAG,
    responses(
        (status = 101, description = "Switching to the WebSocket protocol"),
        (status = 401, description = "Not logged in", body = crate::model::api::ErrorDto)
    ),
)]
pub async fn connect(
    State(state): State<AppState>,
    session: Session,
    upgrade: WebSocketUpgrade,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;
    let user_id = current.id();
    let hub = state.push.clone();

    Ok(upgrade.on_upgrade(move |socket| serve_socket(socket, hub, user_id)))
}

async fn serve_socket(socket: WebSocket, hub: PushHub, user_id: i32) {
    let (mut sink, mut stream) = socket.split();

    // Subscribe before announcing so the online count reaches this socket too.
    let mut events = hub.subscribe();
    if send_event(&mut sink, &PushEvent::Connected { user_id })
        .await
        .is_err()
    {
        return;
    }
    hub.connect(user_id).await;
    tracing::debug!("user {} connected to realtime push", user_id);

    loop {
        tokio::select! {
            inbound = stream.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    if is_ping(text.as_str())
                        && send_event(&mut sink, &PushEvent::Pong).await.is_err()
                    {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    tracing::debug!("socket of user {} failed: {}", user_id, err);
                    break;
                }
            },
            outbound = events.recv() => match outbound {
                Ok(envelope) => {
                    if envelope.recipients.includes(user_id)
                        && send_event(&mut sink, &envelope.event).await.is_err()
                    {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("socket of user {} skipped {} events", user_id, skipped);
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    hub.disconnect(user_id).await;
    tracing::debug!("user {} disconnected from realtime push", user_id);
}

async fn send_event<S>(sink: &mut S, event: &PushEvent) -> Result<(), ()>
where
    S: SinkExt<Message> + Unpin,
{
    let Ok(payload) = serde_json::to_string(event) else {
        return Err(());
    };
    sink.send(Message::Text(payload.into()))
        .await
        .map_err(|_| ())
}

fn is_ping(text: &str) -> bool {
    let text = text.trim();
    if text.eq_ignore_ascii_case("ping") {
        return true;
    }
    serde_json::from_str::<ClientFrame>(text)
        .map(|frame| frame.kind == "ping")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::is_ping;

    #[test]
    fn recognises_ping_frames() {
        assert!(is_ping("ping"));
        assert!(is_ping(" PING "));
        assert!(is_ping(r#"{"type":"ping"}"#));
        assert!(!is_ping(r#"{"type":"pong"}"#));
        assert!(!is_ping("hello"));
    }
}
