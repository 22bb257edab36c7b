//! User operations.
//!
//! Registration and credentials live in the account layer; this service only
//! needs to create rows for seeding and to resolve the triggering user.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::User;
use crate::validation::validate_email;

/// Create a new user and return the stored row.
pub async fn create_user(pool: &SqlitePool, username: &str, email: Option<&str>) -> Result<User> {
    if let Some(email) = email {
        validate_email(email)?;
    }

    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email)
        VALUES (?, ?)
        RETURNING id, username, email
        "#,
    )
    .bind(username)
    .bind(email.map(str::trim))
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "User",
                    id: username.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: id.to_string(),
    })
}

/// Get a user by username.
pub async fn get_user_by_username(pool: &SqlitePool, username: &str) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: username.to_string(),
    })
}
