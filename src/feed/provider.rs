//! Feed connection provider seam.
//!
//! The hub never creates database connections itself: a [`FeedProvider`]
//! is injected at construction so the collaborator owns pool lifecycle and
//! the hub can be instantiated against any feed source. The production
//! implementation wraps [`sqlx::postgres::PgListener`] over a shared
//! [`PgPool`] and holds a `LISTEN` subscription; it is never used for
//! domain queries.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgListener;

use crate::error::FeedError;

/// One change notification surfaced by the feed.
///
/// Ephemeral: exists only for the duration of one broadcast pass. The
/// payload is opaque to the hub and forwarded to clients verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Named topic the notification was published on.
    pub channel: String,
    /// Raw payload as received from the feed.
    pub payload: String,
}

/// A single live subscription to the notification feed.
#[async_trait]
pub trait FeedConnection: Send {
    /// Waits for the next notification.
    ///
    /// # Errors
    ///
    /// Returns a [`FeedError`] when the connection is lost; the caller is
    /// expected to drop the connection and acquire a fresh one.
    async fn recv(&mut self) -> Result<Notification, FeedError>;
}

/// Source of feed connections.
#[async_trait]
pub trait FeedProvider: Send + Sync + 'static {
    /// Acquires a new dedicated feed connection.
    ///
    /// # Errors
    ///
    /// Returns a [`FeedError`] if no connection can be established; the
    /// caller retries with backoff.
    async fn connect(&self) -> Result<Box<dyn FeedConnection>, FeedError>;
}

/// PostgreSQL `LISTEN`/`NOTIFY` feed provider.
///
/// Each `connect` checks a dedicated connection out of the shared pool and
/// issues `LISTEN` for every configured channel. Channel names map 1:1 to
/// hub channel names.
#[derive(Debug, Clone)]
pub struct PgFeedProvider {
    pool: PgPool,
    channels: Vec<String>,
}

impl PgFeedProvider {
    /// Creates a provider over the given pool and channel list.
    #[must_use]
    pub fn new(pool: PgPool, channels: Vec<String>) -> Self {
        Self { pool, channels }
    }
}

#[async_trait]
impl FeedProvider for PgFeedProvider {
    async fn connect(&self) -> Result<Box<dyn FeedConnection>, FeedError> {
        let mut listener = PgListener::connect_with(&self.pool).await?;
        listener
            .listen_all(self.channels.iter().map(String::as_str))
            .await?;
        tracing::info!(channels = ?self.channels, "feed subscription established");
        Ok(Box::new(PgFeedConnection { listener }))
    }
}

/// Live `LISTEN` subscription backed by a dedicated pool connection.
struct PgFeedConnection {
    listener: PgListener,
}

#[async_trait]
impl FeedConnection for PgFeedConnection {
    async fn recv(&mut self) -> Result<Notification, FeedError> {
        let raw = self.listener.recv().await?;
        Ok(Notification {
            channel: raw.channel().to_string(),
            payload: raw.payload().to_string(),
        })
    }
}
