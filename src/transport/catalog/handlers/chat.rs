use crate::transport::catalog::chat::ChatHub;
use crate::transport::catalog::CatalogState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{sink::SinkExt, stream::StreamExt};
use tokio::sync::broadcast::error::RecvError;

/// WebSocket upgrade handler.
///
/// Endpoint: GET /chat
pub async fn chat_handler(ws: WebSocketUpgrade, State(state): State<CatalogState>) -> Response {
    let hub = state.chat.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, hub))
}

async fn handle_socket(socket: WebSocket, hub: ChatHub) {
    let (mut sender, mut receiver) = socket.split();
    let (mut rx, guard) = hub.join();
    tracing::info!(connections = hub.connections(), "chat client connected");

    // Fan-out: broadcast channel -> this socket.
    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(text) => {
                    if sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "chat client lagging, messages dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Fan-in: this socket -> broadcast channel.
    let publisher = hub.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    publisher.publish(text);
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    }

    drop(guard);
    tracing::info!(connections = hub.connections(), "chat client disconnected");
}
