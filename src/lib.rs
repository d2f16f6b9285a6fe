//! # pulse-gateway
//!
//! WebSocket broadcast gateway bridging PostgreSQL notification channels
//! to subscribed clients.
//!
//! An upstream indexing pipeline writes records and raises `NOTIFY` events
//! on named database channels. This service holds one resilient `LISTEN`
//! subscription to those channels and fans every notification out to the
//! WebSocket clients subscribed to its channel. The hub is a coordination
//! layer only: payloads pass through verbatim and nothing is persisted.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket)
//!     │
//!     ├── WS Transport (ws/)
//!     │
//!     ├── Hub (hub/)
//!     │     ├── ClientRegistry
//!     │     ├── MessageRouter
//!     │     └── Broadcaster
//!     │
//!     ├── NotificationListener (feed/)
//!     │
//!     └── PostgreSQL LISTEN/NOTIFY
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod error;
pub mod feed;
pub mod hub;
pub mod ws;
