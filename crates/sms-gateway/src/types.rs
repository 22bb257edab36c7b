//! Request and response types for the messages endpoint.

use serde::{Deserialize, Serialize};

/// Form body for creating a message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutboundSms {
    /// Destination in E.164 form.
    pub to: String,
    /// Sender number.
    pub from: String,
    /// Message text.
    pub body: String,
}

/// Successful message creation response.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageReceipt {
    /// Provider message identifier.
    pub sid: String,
    /// Initial delivery status (`queued`, `sent`, ...).
    #[serde(default)]
    pub status: Option<String>,
}

/// Error body returned by the provider on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    pub message: String,
}
