//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered user of the safety service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Unique login name, also used in alert messages.
    pub username: String,
    /// Account email, if provided at registration.
    pub email: Option<String>,
}

/// An emergency contact owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Contact {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// Display name.
    pub name: String,
    /// Phone number exactly as entered (may be empty).
    pub phone: String,
    /// Email address, if any.
    pub email: Option<String>,
}

/// A recorded SOS trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct EmergencyEvent {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Triggering user.
    pub user_id: i64,
    /// Free-form location, usually `"lat,lon"`.
    pub location: String,
    /// Trigger tag (`manual`, `voice`, `keyword`, `periodic_update`, ...).
    pub trigger_type: String,
    /// `active` or `resolved`.
    pub status: String,
    /// Creation timestamp (UTC, RFC 3339).
    pub created_at: String,
}

/// One persisted notification attempt for an emergency event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DispatchAttemptRecord {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Event this attempt belongs to.
    pub event_id: i64,
    /// Contact notified (cleared if the contact is later deleted).
    pub contact_id: Option<i64>,
    /// Contact name at the time of the attempt.
    pub contact_name: String,
    /// `sms` or `email`.
    pub channel: String,
    /// Normalized phone number or email address.
    pub destination: String,
    /// `sent`, `simulated` or `failed`.
    pub outcome: String,
    /// Transport identifier on success, error detail on failure.
    pub detail: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// Input for [`crate::dispatch_attempt::record_attempt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDispatchAttempt<'a> {
    pub event_id: i64,
    pub contact_id: Option<i64>,
    pub contact_name: &'a str,
    pub channel: &'a str,
    pub destination: &'a str,
    pub outcome: &'a str,
    pub detail: Option<&'a str>,
}
