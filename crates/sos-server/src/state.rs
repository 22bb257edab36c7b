//! Application state shared across handlers.

use database::Database;
use dispatch::Dispatcher;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Emergency notification dispatcher.
    pub dispatcher: Dispatcher,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database, dispatcher: Dispatcher) -> Self {
        Self { db, dispatcher }
    }
}
