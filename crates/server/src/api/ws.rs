//! WebSocket support for real-time scan state updates.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::metrics::{
    WS_CONNECTIONS_ACTIVE, WS_CONNECTIONS_TOTAL, WS_LAG_EVENTS, WS_MESSAGES_SENT,
};
use crate::state::AppState;

/// GET /api/v1/ws
///
/// Upgrade to a WebSocket that streams scan state transitions as JSON.
/// Every event carries its scan id, so clients following one run can ignore
/// events from superseded runs.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    WS_CONNECTIONS_TOTAL.inc();
    WS_CONNECTIONS_ACTIVE.inc();
    debug!("websocket client connected");

    let (mut sender, mut receiver) = socket.split();
    let mut events = state.events().subscribe();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let Ok(text) = serde_json::to_string(&event) else {
                        continue;
                    };
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                    WS_MESSAGES_SENT.inc();
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    WS_LAG_EVENTS.inc();
                    warn!(skipped, "websocket client lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            message = receiver.next() => match message {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(_)) => break,
                // Inbound messages are ignored; the channel is push-only.
                Some(Ok(_)) => {}
            },
        }
    }

    WS_CONNECTIONS_ACTIVE.dec();
    debug!("websocket client disconnected");
}
