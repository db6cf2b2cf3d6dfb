//! WebSocket transport: one runtime connection per socket.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use runtime::{Connection, RuntimeHandle};

use crate::AppState;

pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.runtime))
}

async fn handle_socket(socket: WebSocket, runtime: RuntimeHandle) {
    let Connection { id, mut frames } = match runtime.connect().await {
        Ok(connection) => connection,
        Err(error) => {
            warn!(%error, "Runtime refused connection");
            return;
        }
    };
    info!(connection = %id, "WebSocket connected");

    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = frames.recv().await {
            if sender.send(Message::Text(frame.to_string())).await.is_err() {
                break;
            }
        }
    });

    let reader = async {
        while let Some(message) = receiver.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    if runtime.send(id, text).await.is_err() {
                        break;
                    }
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(error) => {
                    debug!(connection = %id, %error, "WebSocket read failed");
                    break;
                }
            }
        }
    };

    tokio::select! {
        _ = reader => {}
        _ = &mut send_task => {}
    }

    if let Err(error) = runtime.disconnect(id).await {
        debug!(connection = %id, %error, "Disconnect after runtime stop");
    }
    send_task.abort();
    info!(connection = %id, "WebSocket closed");
}
