use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Extension, Query};
use axum::response::Response;
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::http_error::AppError;
use crate::plugins::auth::handlers::decode_token;
use crate::realtime::EventHub;

#[derive(serde::Deserialize)]
pub struct WsQuery {
    pub token: String,
}

// browsers cannot set headers on the websocket handshake, so the bearer
// token rides in the query string
pub async fn ws_upgrade(
    ws: WebSocketUpgrade,
    Extension(hub): Extension<Arc<EventHub>>,
    Query(q): Query<WsQuery>,
) -> Result<Response, AppError> {
    let auth = decode_token(&q.token)?;
    Ok(ws.on_upgrade(move |socket| serve_socket(socket, hub, auth.event_id)))
}

async fn serve_socket(socket: WebSocket, hub: Arc<EventHub>, wedding_event_id: Uuid) {
    let mut feed = hub.subscribe(wedding_event_id);
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            event = feed.recv() => {
                match event {
                    Ok(ev) => {
                        let Ok(text) = serde_json::to_string(&ev) else { continue };
                        if sender.send(Message::Text(text)).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!("ws subscriber lagged, skipped {} events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            msg = receiver.next() => {
                match msg {
                    // inbound frames are ignored; the stream is one-way
                    Some(Ok(_)) => {}
                    _ => break,
                }
            }
        }
    }
}
