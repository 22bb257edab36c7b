//! Emergency routes.

use axum::extract::{Path, State};
use axum::Json;
use database::{contact, emergency};
use dispatch::{DeliveryMode, TriggerType};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::CurrentUser;
use crate::error::Result;
use crate::state::AppState;

/// Emergency trigger request. Both fields may be omitted.
#[derive(Debug, Default, Deserialize)]
pub struct TriggerRequest {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, rename = "type")]
    pub trigger_type: Option<String>,
}

/// Emergency trigger result.
#[derive(Debug, Serialize)]
pub struct TriggerResponse {
    pub status: &'static str,
    pub message: String,
    pub event_id: i64,
    pub sms_count: usize,
    pub mode: DeliveryMode,
}

/// Event resolution result.
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub status: &'static str,
    pub event_id: i64,
    pub event_status: String,
}

/// Record an emergency event and notify the caller's contacts.
///
/// Only a failure to record the event is an error. Once it is stored, the
/// request succeeds whatever happens to individual notifications.
pub async fn trigger(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Option<Json<TriggerRequest>>,
) -> Result<Json<TriggerResponse>> {
    let req = payload.map(|Json(req)| req).unwrap_or_default();
    let location = req.location.unwrap_or_default();
    let trigger = TriggerType::parse(req.trigger_type.as_deref().unwrap_or_default());

    let pool = state.db.pool();
    let event = emergency::record_event(pool, user.id, &location, trigger.as_str()).await?;

    info!(
        event_id = event.id,
        user_id = user.id,
        trigger = %trigger,
        "Emergency event recorded"
    );

    let contacts = match contact::list_contacts_for_user(pool, user.id).await {
        Ok(contacts) => contacts,
        Err(err) => {
            warn!(event_id = event.id, error = %err, "Failed to load contacts");
            Vec::new()
        }
    };

    let summary = state.dispatcher.dispatch(&user, &contacts, &event).await;

    Ok(Json(TriggerResponse {
        status: "success",
        message: summary.message,
        event_id: event.id,
        sms_count: summary.sms_sent,
        mode: summary.mode,
    }))
}

/// Mark one of the caller's events as resolved.
pub async fn resolve(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<Json<ResolveResponse>> {
    let event = emergency::resolve_event(state.db.pool(), event_id, user.id).await?;

    info!(event_id = event.id, user_id = user.id, "Emergency resolved");

    Ok(Json(ResolveResponse {
        status: "success",
        event_id: event.id,
        event_status: event.status,
    }))
}
