//! Connected-client storage.
//!
//! [`ClientRegistry`] owns every client record for the lifetime of its
//! connection. All access goes through one [`tokio::sync::Mutex`], so
//! registry mutations and dispatch are serialized with respect to each
//! other. Nothing inside the lock performs I/O: socket handles are cloned
//! out and written to after the lock is released.
//!
//! Registry membership is the sole authority for "is this client known".
//! Every operation against an unknown id is a no-op, never an error.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::Mutex;

use super::ClientId;
use super::socket::ClientSocket;

/// One client record: the transport's socket handle plus the channel set
/// the client is subscribed to. The set may be empty at any time without
/// affecting registry membership.
#[derive(Debug)]
struct ClientEntry {
    socket: Arc<dyn ClientSocket>,
    channels: HashSet<String>,
}

/// Central store for all connected clients.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: Mutex<HashMap<ClientId, ClientEntry>>,
}

impl ClientRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a client with an empty subscription set.
    ///
    /// Re-adding an existing id overwrites its entry: the old socket handle
    /// is dropped and the subscription set resets, so a reconnecting client
    /// is never double-counted.
    pub async fn add_client(&self, id: ClientId, socket: Arc<dyn ClientSocket>) {
        let mut clients = self.clients.lock().await;
        clients.insert(
            id,
            ClientEntry {
                socket,
                channels: HashSet::new(),
            },
        );
        tracing::debug!(client = %id, total = clients.len(), "client registered");
    }

    /// Discards a client's entry. Absent id is a no-op.
    pub async fn remove_client(&self, id: ClientId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(&id).is_some() {
            tracing::debug!(client = %id, total = clients.len(), "client removed");
        }
    }

    /// Adds each channel to the client's subscription set. Unknown id is a
    /// no-op.
    pub async fn subscribe(&self, id: ClientId, channels: &[String]) {
        let mut clients = self.clients.lock().await;
        if let Some(entry) = clients.get_mut(&id) {
            for channel in channels {
                entry.channels.insert(channel.clone());
            }
        }
    }

    /// Removes each channel from the client's subscription set. Unknown id
    /// is a no-op.
    pub async fn unsubscribe(&self, id: ClientId, channels: &[String]) {
        let mut clients = self.clients.lock().await;
        if let Some(entry) = clients.get_mut(&id) {
            for channel in channels {
                entry.channels.remove(channel);
            }
        }
    }

    /// Returns the client's socket handle, if the client is known.
    pub async fn socket(&self, id: ClientId) -> Option<Arc<dyn ClientSocket>> {
        let clients = self.clients.lock().await;
        clients.get(&id).map(|entry| Arc::clone(&entry.socket))
    }

    /// Snapshots the sockets of every client subscribed to `channel`.
    ///
    /// The snapshot is taken under the registry lock; the caller sends to
    /// the returned handles after the lock is released.
    pub async fn subscribers(&self, channel: &str) -> Vec<(ClientId, Arc<dyn ClientSocket>)> {
        let clients = self.clients.lock().await;
        clients
            .iter()
            .filter(|(_, entry)| entry.channels.contains(channel))
            .map(|(id, entry)| (*id, Arc::clone(&entry.socket)))
            .collect()
    }

    /// Empties the registry, returning every client's socket handle.
    pub async fn drain(&self) -> Vec<(ClientId, Arc<dyn ClientSocket>)> {
        let mut clients = self.clients.lock().await;
        clients
            .drain()
            .map(|(id, entry)| (id, entry.socket))
            .collect()
    }

    /// Returns the number of registered clients.
    pub async fn len(&self) -> usize {
        self.clients.lock().await.len()
    }

    /// Returns `true` if no clients are registered.
    pub async fn is_empty(&self) -> bool {
        self.clients.lock().await.is_empty()
    }
}
