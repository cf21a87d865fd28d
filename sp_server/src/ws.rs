//! WebSocket endpoint.
//!
//! # Connection flow
//!
//! 1. A client connects to `GET /ws` and is assigned a fresh viewer id.
//! 2. The socket is split: a spawned send task drains this viewer's
//!    outbound channel (state broadcasts and error messages) into the
//!    socket, while the receive loop parses inbound events and forwards
//!    them to the table actor.
//! 3. On close or error the viewer is detached, which the table treats
//!    as a disconnect.
//!
//! All rule decisions happen inside the table actor; this module only
//! moves JSON.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

use sixmax_poker::{ClientEvent, ServerEvent, TableHandle, TableMessage};

/// Shared router state: the handle to the single table actor.
#[derive(Clone)]
pub struct AppState {
    pub table: TableHandle,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let viewer = Uuid::new_v4();
    let (mut sink, mut stream) = socket.split();

    // Per-viewer outbound channel; the actor broadcasts into it with a
    // non-blocking send, so a stalled socket only costs itself updates.
    let (tx, mut rx) = mpsc::channel::<ServerEvent>(32);

    if state
        .table
        .send(TableMessage::Attach {
            viewer,
            sender: tx.clone(),
        })
        .await
        .is_err()
    {
        error!("table actor is gone, dropping connection");
        return;
    }
    info!("websocket connected: viewer={viewer}");

    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(err) => {
                    error!("failed to serialize outbound event: {err}");
                    continue;
                }
            };
            if sink.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => {
                    if state
                        .table
                        .send(TableMessage::Client { viewer, event })
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
                Err(err) => {
                    warn!("viewer {viewer} sent unparseable event: {err}");
                    let _ = tx
                        .send(ServerEvent::ErrorMessage {
                            message: "Invalid message format".to_string(),
                        })
                        .await;
                }
            },
            Ok(Message::Close(_)) => break,
            Err(err) => {
                warn!("websocket error for viewer {viewer}: {err}");
                break;
            }
            _ => {}
        }
    }

    let _ = state.table.send(TableMessage::Detach { viewer }).await;
    send_task.abort();
    info!("websocket disconnected: viewer={viewer}");
}
