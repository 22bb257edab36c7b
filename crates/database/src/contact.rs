//! Contact directory operations.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::Contact;
use crate::validation::{validate_email, validate_name, validate_phone};

/// Add an emergency contact for a user.
///
/// At least one of `phone` or `email` must be present; a blank phone is
/// stored as an empty string and skipped for SMS at dispatch time.
pub async fn add_contact(
    pool: &SqlitePool,
    user_id: i64,
    name: &str,
    phone: &str,
    email: Option<&str>,
) -> Result<Contact> {
    validate_name(name)?;

    let phone = phone.trim();
    let email = email.map(str::trim).filter(|e| !e.is_empty());

    if !phone.is_empty() || email.is_none() {
        validate_phone(phone)?;
    }
    if let Some(email) = email {
        validate_email(email)?;
    }

    let contact = sqlx::query_as::<_, Contact>(
        r#"
        INSERT INTO contacts (user_id, name, phone, email)
        VALUES (?, ?, ?, ?)
        RETURNING id, user_id, name, phone, email
        "#,
    )
    .bind(user_id)
    .bind(name.trim())
    .bind(phone)
    .bind(email)
    .fetch_one(pool)
    .await?;

    tracing::debug!(user_id, contact_id = contact.id, "Added emergency contact");
    Ok(contact)
}

/// List a user's contacts in insertion order.
pub async fn list_contacts_for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Contact>> {
    let contacts = sqlx::query_as::<_, Contact>(
        r#"
        SELECT id, user_id, name, phone, email
        FROM contacts
        WHERE user_id = ?
        ORDER BY id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(contacts)
}

/// Count a user's contacts.
pub async fn count_contacts_for_user(pool: &SqlitePool, user_id: i64) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM contacts WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
