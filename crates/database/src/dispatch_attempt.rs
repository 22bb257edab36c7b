//! Dispatch attempt audit rows.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{DispatchAttemptRecord, NewDispatchAttempt};

/// Append one attempt and return its row ID.
pub async fn record_attempt(pool: &SqlitePool, attempt: &NewDispatchAttempt<'_>) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO dispatch_attempts
            (event_id, contact_id, contact_name, channel, destination, outcome, detail)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(attempt.event_id)
    .bind(attempt.contact_id)
    .bind(attempt.contact_name)
    .bind(attempt.channel)
    .bind(attempt.destination)
    .bind(attempt.outcome)
    .bind(attempt.detail)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// List all attempts for an event in the order they were made.
pub async fn list_attempts_for_event(
    pool: &SqlitePool,
    event_id: i64,
) -> Result<Vec<DispatchAttemptRecord>> {
    let attempts = sqlx::query_as::<_, DispatchAttemptRecord>(
        r#"
        SELECT id, event_id, contact_id, contact_name, channel, destination, outcome, detail, created_at
        FROM dispatch_attempts
        WHERE event_id = ?
        ORDER BY id
        "#,
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    Ok(attempts)
}
