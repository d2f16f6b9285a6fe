//! Per-connection read/write loop.
//!
//! Each upgraded socket gets one task running [`run_connection`]. The hub
//! side never touches the socket directly: it holds a [`WsClientSocket`]
//! that enqueues frames on an unbounded channel, and this task drains the
//! channel into the write half. The task calls `add_client` on entry and
//! `remove_client` on exit; the hub initiates teardown only through the
//! queued close command during shutdown.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::error::SocketError;
use crate::hub::{ClientId, ClientSocket, Hub};

/// Commands queued for the connection's writer half.
#[derive(Debug)]
enum OutboundFrame {
    Text(String),
    Close,
}

/// Hub-side handle for one WebSocket connection.
///
/// `send` enqueues without blocking, so a slow reader on the other end
/// backs up its own queue instead of stalling broadcasts to everyone else.
#[derive(Debug)]
struct WsClientSocket {
    tx: mpsc::UnboundedSender<OutboundFrame>,
}

#[async_trait]
impl ClientSocket for WsClientSocket {
    fn send(&self, frame: &str) -> Result<(), SocketError> {
        self.tx
            .send(OutboundFrame::Text(frame.to_owned()))
            .map_err(|_| SocketError::Closed)
    }

    async fn close(&self) -> Result<(), SocketError> {
        self.tx
            .send(OutboundFrame::Close)
            .map_err(|_| SocketError::Closed)
    }
}

/// Runs the read/write loop for a single WebSocket connection.
pub async fn run_connection(socket: WebSocket, hub: Arc<Hub>) {
    let client_id = ClientId::new();
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel();

    hub.add_client(client_id, Arc::new(WsClientSocket { tx: out_tx }))
        .await;
    tracing::debug!(client = %client_id, "ws client connected");

    loop {
        tokio::select! {
            inbound = ws_rx.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        hub.handle_message(client_id, &text).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(error)) => {
                        tracing::debug!(client = %client_id, %error, "ws read failed");
                        break;
                    }
                    _ => {}
                }
            }
            outbound = out_rx.recv() => {
                match outbound {
                    Some(OutboundFrame::Text(text)) => {
                        if ws_tx.send(Message::text(text)).await.is_err() {
                            break;
                        }
                    }
                    // A dropped sender means the hub discarded this client;
                    // treat it the same as an explicit close command.
                    Some(OutboundFrame::Close) | None => {
                        let _ = ws_tx.send(Message::Close(None)).await;
                        break;
                    }
                }
            }
        }
    }

    hub.remove_client(client_id).await;
    tracing::debug!(client = %client_id, "ws client disconnected");
}
