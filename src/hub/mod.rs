//! Broadcast hub: client registry, control-frame routing, and fan-out.
//!
//! [`Hub`] is the facade the transport talks to. It owns the client
//! registry, the message router, and the feed listener, and coordinates
//! startup and shutdown. All registry mutation and dispatch serializes on
//! the registry's single mutex; the feed connection runs on its own task
//! and is never awaited by client-driven operations.

pub mod broadcaster;
pub mod client_id;
pub mod messages;
pub mod registry;
pub mod router;
pub mod socket;

#[cfg(test)]
pub(crate) mod test_support;

pub use broadcaster::Broadcaster;
pub use client_id::ClientId;
pub use registry::ClientRegistry;
pub use router::MessageRouter;
pub use socket::ClientSocket;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::feed::{BackoffConfig, FeedProvider, NotificationListener};

/// Tuning knobs for a hub instance.
#[derive(Debug, Clone, Copy)]
pub struct HubConfig {
    /// Feed reconnect backoff bounds.
    pub backoff: BackoffConfig,
    /// Per-client bound on a close attempt during shutdown.
    pub close_timeout: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            backoff: BackoffConfig::default(),
            close_timeout: Duration::from_secs(5),
        }
    }
}

/// Aggregate hub status.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HubStatus {
    /// Whether a live feed connection is currently held.
    pub connected: bool,
    /// Number of registered clients.
    pub client_count: usize,
}

/// The realtime broadcast hub.
///
/// Construction returns immediately: the feed connection is acquired in
/// the background and retried until it succeeds, so every hub method
/// (including [`Hub::status`] and [`Hub::shutdown`]) is safe to call
/// before the first connection resolves.
#[derive(Debug)]
pub struct Hub {
    registry: Arc<ClientRegistry>,
    router: MessageRouter,
    listener: NotificationListener,
    close_timeout: Duration,
}

impl Hub {
    /// Builds a hub over the injected feed provider and spawns its
    /// listener task.
    #[must_use]
    pub fn new(provider: Arc<dyn FeedProvider>, config: HubConfig) -> Self {
        let registry = Arc::new(ClientRegistry::new());
        let broadcaster = Broadcaster::new(Arc::clone(&registry));
        let listener = NotificationListener::spawn(provider, broadcaster, config.backoff);
        let router = MessageRouter::new(Arc::clone(&registry));
        Self {
            registry,
            router,
            listener,
            close_timeout: config.close_timeout,
        }
    }

    /// Registers a client. Called by the transport when a connection is
    /// established.
    pub async fn add_client(&self, id: ClientId, socket: Arc<dyn ClientSocket>) {
        self.registry.add_client(id, socket).await;
    }

    /// Removes a client. Called by the transport when the connection ends.
    pub async fn remove_client(&self, id: ClientId) {
        self.registry.remove_client(id).await;
    }

    /// Routes one inbound text frame from the given client.
    pub async fn handle_message(&self, id: ClientId, raw: &str) {
        self.router.handle_message(id, raw).await;
    }

    /// Returns feed connectivity and the live client count.
    pub async fn status(&self) -> HubStatus {
        HubStatus {
            connected: self.listener.is_connected(),
            client_count: self.registry.len().await,
        }
    }

    /// Shuts the hub down: stops the feed loop, then closes every
    /// registered client and clears the registry.
    ///
    /// Close attempts run concurrently, each bounded by the configured
    /// timeout, so one hung or failing socket cannot prevent the rest
    /// from closing. Idempotent: a second call finds an empty registry
    /// and resolves immediately.
    pub async fn shutdown(&self) {
        self.listener.shutdown();

        let clients = self.registry.drain().await;
        let total = clients.len();
        let close_timeout = self.close_timeout;

        let attempts = clients.into_iter().map(|(id, client_socket)| async move {
            match tokio::time::timeout(close_timeout, client_socket.close()).await {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    tracing::warn!(client = %id, %error, "client close failed during shutdown");
                }
                Err(_) => {
                    tracing::warn!(client = %id, "client close timed out during shutdown");
                }
            }
        });
        futures_util::future::join_all(attempts).await;

        tracing::info!(clients = total, "hub shut down");
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use async_trait::async_trait;

    use super::test_support::RecordingSocket;
    use super::*;
    use crate::error::FeedError;
    use crate::feed::FeedConnection;

    /// Provider for a feed that is down: every connect attempt fails.
    struct OfflineProvider;

    #[async_trait]
    impl FeedProvider for OfflineProvider {
        async fn connect(&self) -> Result<Box<dyn FeedConnection>, FeedError> {
            Err(FeedError::Unavailable("offline".to_string()))
        }
    }

    fn offline_hub() -> Hub {
        Hub::new(
            Arc::new(OfflineProvider),
            HubConfig {
                backoff: BackoffConfig {
                    initial: Duration::from_millis(1),
                    max: Duration::from_millis(5),
                },
                close_timeout: Duration::from_millis(50),
            },
        )
    }

    #[tokio::test]
    async fn status_is_safe_before_feed_resolves() {
        let hub = offline_hub();
        let status = hub.status().await;
        assert!(!status.connected);
        assert_eq!(status.client_count, 0);
    }

    #[tokio::test]
    async fn add_and_remove_change_client_count_by_one() {
        let hub = offline_hub();
        let id = ClientId::new();

        hub.add_client(id, RecordingSocket::new()).await;
        assert_eq!(hub.status().await.client_count, 1);

        hub.remove_client(id).await;
        assert_eq!(hub.status().await.client_count, 0);
    }

    #[tokio::test]
    async fn control_plane_works_while_feed_is_down() {
        let hub = offline_hub();
        let id = ClientId::new();
        let socket = RecordingSocket::new();
        hub.add_client(id, Arc::clone(&socket) as _).await;

        hub.handle_message(id, r#"{"type":"subscribe","channels":["summit"]}"#)
            .await;
        hub.handle_message(id, r#"{"type":"ping"}"#).await;

        assert_eq!(
            socket.sent(),
            vec![
                r#"{"type":"subscribed","channels":["summit"]}"#.to_string(),
                r#"{"type":"pong"}"#.to_string(),
            ]
        );
        assert!(!hub.status().await.connected);
    }

    #[tokio::test]
    async fn shutdown_closes_every_client_exactly_once() {
        let hub = offline_hub();
        let a = RecordingSocket::new();
        let b = RecordingSocket::new();
        hub.add_client(ClientId::new(), Arc::clone(&a) as _).await;
        hub.add_client(ClientId::new(), Arc::clone(&b) as _).await;

        hub.shutdown().await;

        assert_eq!(a.close_count(), 1);
        assert_eq!(b.close_count(), 1);
        assert_eq!(hub.status().await.client_count, 0);
    }

    #[tokio::test]
    async fn shutdown_tolerates_failing_close() {
        let hub = offline_hub();
        let bad = RecordingSocket::failing_close();
        let good = RecordingSocket::new();
        hub.add_client(ClientId::new(), Arc::clone(&bad) as _).await;
        hub.add_client(ClientId::new(), Arc::clone(&good) as _).await;

        hub.shutdown().await;

        assert_eq!(bad.close_count(), 1);
        assert_eq!(good.close_count(), 1);
        assert_eq!(hub.status().await.client_count, 0);
    }

    #[tokio::test]
    async fn shutdown_is_bounded_by_close_timeout() {
        let hub = offline_hub();
        let hung = RecordingSocket::hanging_close();
        let good = RecordingSocket::new();
        hub.add_client(ClientId::new(), Arc::clone(&hung) as _).await;
        hub.add_client(ClientId::new(), Arc::clone(&good) as _).await;

        let done = tokio::time::timeout(Duration::from_secs(2), hub.shutdown()).await;
        assert!(done.is_ok());
        assert_eq!(good.close_count(), 1);
        assert_eq!(hub.status().await.client_count, 0);
    }

    #[tokio::test]
    async fn shutdown_with_zero_clients_resolves() {
        let hub = offline_hub();
        hub.shutdown().await;
        assert_eq!(hub.status().await.client_count, 0);
    }

    #[tokio::test]
    async fn shutdown_twice_is_safe() {
        let hub = offline_hub();
        let socket = RecordingSocket::new();
        hub.add_client(ClientId::new(), Arc::clone(&socket) as _).await;

        hub.shutdown().await;
        hub.shutdown().await;

        // Second pass finds an empty registry; nothing closes twice.
        assert_eq!(socket.close_count(), 1);
        assert_eq!(hub.status().await.client_count, 0);
    }
}
