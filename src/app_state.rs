//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::hub::Hub;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The broadcast hub.
    pub hub: Arc<Hub>,
}
