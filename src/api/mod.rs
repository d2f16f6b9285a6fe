//! HTTP API layer: system endpoints and router composition.
//!
//! The gateway's HTTP surface is intentionally small: health and hub
//! status. Query and pagination endpoints live in the indexing service
//! that owns the relational schema.

pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router.
pub fn build_router() -> Router<AppState> {
    Router::new().merge(system::routes())
}
