//! HTTP front end for SafeWalk emergency triggers.
//!
//! Records the caller's emergency event, then hands it to the
//! [`dispatch::Dispatcher`] to notify their contacts.

pub mod audit_db;
pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use audit_db::DatabaseAuditSink;
pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use state::AppState;

/// Build the complete application with request tracing.
pub fn app(state: AppState) -> Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
