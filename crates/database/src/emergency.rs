//! Emergency event operations.
//!
//! Events are written before any notification is attempted; only `status`
//! changes after creation.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::EmergencyEvent;

/// Status of a freshly recorded event.
pub const STATUS_ACTIVE: &str = "active";

/// Status after the user marks the emergency as over.
pub const STATUS_RESOLVED: &str = "resolved";

/// Record a new emergency event.
pub async fn record_event(
    pool: &SqlitePool,
    user_id: i64,
    location: &str,
    trigger_type: &str,
) -> Result<EmergencyEvent> {
    let event = sqlx::query_as::<_, EmergencyEvent>(
        r#"
        INSERT INTO emergency_events (user_id, location, trigger_type, status)
        VALUES (?, ?, ?, ?)
        RETURNING id, user_id, location, trigger_type, status, created_at
        "#,
    )
    .bind(user_id)
    .bind(location)
    .bind(trigger_type)
    .bind(STATUS_ACTIVE)
    .fetch_one(pool)
    .await?;

    tracing::info!(
        event_id = event.id,
        user_id,
        trigger_type = %trigger_type,
        "Recorded emergency event"
    );
    Ok(event)
}

/// Get an event by ID.
pub async fn get_event(pool: &SqlitePool, id: i64) -> Result<EmergencyEvent> {
    sqlx::query_as::<_, EmergencyEvent>(
        r#"
        SELECT id, user_id, location, trigger_type, status, created_at
        FROM emergency_events
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "EmergencyEvent",
        id: id.to_string(),
    })
}

/// Mark one of a user's events as resolved.
///
/// Events owned by another user are reported as not found. Resolving an
/// already resolved event is a no-op.
pub async fn resolve_event(pool: &SqlitePool, id: i64, user_id: i64) -> Result<EmergencyEvent> {
    sqlx::query_as::<_, EmergencyEvent>(
        r#"
        UPDATE emergency_events
        SET status = ?
        WHERE id = ? AND user_id = ?
        RETURNING id, user_id, location, trigger_type, status, created_at
        "#,
    )
    .bind(STATUS_RESOLVED)
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "EmergencyEvent",
        id: id.to_string(),
    })
}
