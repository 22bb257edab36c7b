//! Route handlers for the SOS API.

pub mod emergency;
pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // API endpoints
        .route("/api/emergency/trigger", post(emergency::trigger))
        .route("/api/emergency/:id/resolve", post(emergency::resolve))
}
