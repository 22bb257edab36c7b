//! SafeWalk SOS server.

use std::sync::Arc;

use database::Database;
use dispatch::{AuditFanout, Dispatcher, FileAuditLog};
use sos_server::{AppState, Config, DatabaseAuditSink};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting SOS server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Audit to the text log and the attempts table
    let audit = AuditFanout::new()
        .with_sink(Arc::new(FileAuditLog::new(&config.audit_log)))
        .with_sink(Arc::new(DatabaseAuditSink::new(db.clone())));
    info!(path = %config.audit_log.display(), "Dispatch audit log");

    let dispatcher = Dispatcher::from_config(&config.dispatch, Arc::new(audit))?;

    // Build application
    let app = sos_server::app(AppState::new(db, dispatcher));

    // Start server
    info!(addr = %config.addr, "SOS server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
