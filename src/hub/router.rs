//! Inbound control-frame dispatch.
//!
//! [`MessageRouter`] is the single entry point for text frames arriving
//! from clients. One parse step produces a [`ControlMessage`]; malformed
//! JSON and unrecognized tags are dropped silently, so bad input from a
//! client can never surface as an error in the transport's read loop.

use std::sync::Arc;

use super::ClientId;
use super::messages::{ControlMessage, ControlReply};
use super::registry::ClientRegistry;

/// Parses inbound client frames and dispatches subscribe/unsubscribe/ping.
#[derive(Debug, Clone)]
pub struct MessageRouter {
    registry: Arc<ClientRegistry>,
}

impl MessageRouter {
    /// Creates a router over the given registry.
    #[must_use]
    pub fn new(registry: Arc<ClientRegistry>) -> Self {
        Self { registry }
    }

    /// Handles one raw text frame from the client with the given id.
    ///
    /// Recognized frames mutate the registry and produce exactly one
    /// acknowledgment through the client's socket. A frame from an unknown
    /// id is a complete no-op: there is no socket to reply on.
    pub async fn handle_message(&self, id: ClientId, raw: &str) {
        let Ok(message) = serde_json::from_str::<ControlMessage>(raw) else {
            tracing::debug!(client = %id, "dropping malformed control frame");
            return;
        };

        match message {
            ControlMessage::Subscribe { channels } => {
                let names = channels.clone().unwrap_or_default();
                self.registry.subscribe(id, &names).await;
                self.reply(id, &ControlReply::Subscribed { channels }).await;
            }
            ControlMessage::Unsubscribe { channels } => {
                let names = channels.clone().unwrap_or_default();
                self.registry.unsubscribe(id, &names).await;
                self.reply(id, &ControlReply::Unsubscribed { channels }).await;
            }
            ControlMessage::Ping => {
                self.reply(id, &ControlReply::Pong).await;
            }
            ControlMessage::Other => {
                tracing::debug!(client = %id, "ignoring unrecognized control frame");
            }
        }
    }

    /// Writes one acknowledgment frame through the client's socket.
    /// Send failures are logged and swallowed; delivery is best-effort.
    async fn reply(&self, id: ClientId, reply: &ControlReply) {
        let Some(socket) = self.registry.socket(id).await else {
            return;
        };
        match serde_json::to_string(reply) {
            Ok(json) => {
                if let Err(error) = socket.send(&json) {
                    tracing::debug!(client = %id, %error, "failed to deliver reply");
                }
            }
            Err(error) => {
                tracing::warn!(client = %id, %error, "failed to encode reply frame");
            }
        }
    }
}
