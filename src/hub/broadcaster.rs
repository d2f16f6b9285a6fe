//! Notification fan-out.
//!
//! For each feed notification, [`Broadcaster`] sends the raw payload to
//! every client whose subscription set contains the notification's channel.
//! Sends are per-client fire-and-forget: one dead socket is logged and
//! skipped, and delivery to the remaining clients continues.

use std::sync::Arc;

use super::registry::ClientRegistry;
use crate::feed::Notification;

/// Fans feed notifications out to subscribed clients.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    registry: Arc<ClientRegistry>,
}

impl Broadcaster {
    /// Creates a broadcaster over the given registry.
    #[must_use]
    pub fn new(registry: Arc<ClientRegistry>) -> Self {
        Self { registry }
    }

    /// Delivers one notification to every matching client.
    ///
    /// The payload is forwarded verbatim. A failed send never interrupts
    /// the rest of the pass and never removes the client; removal happens
    /// only through the transport's disconnect callback.
    pub async fn dispatch(&self, notification: &Notification) {
        let targets = self.registry.subscribers(&notification.channel).await;
        let mut delivered = 0usize;

        for (id, socket) in targets {
            match socket.send(&notification.payload) {
                Ok(()) => delivered = delivered.saturating_add(1),
                Err(error) => {
                    tracing::warn!(
                        client = %id,
                        channel = %notification.channel,
                        %error,
                        "broadcast send failed"
                    );
                }
            }
        }

        tracing::debug!(
            channel = %notification.channel,
            delivered,
            "notification fanned out"
        );
    }
}
