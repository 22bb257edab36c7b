//! Error types for sms-gateway.

use thiserror::Error;

/// Errors that can occur when talking to the SMS provider.
#[derive(Debug, Error)]
pub enum SmsError {
    /// HTTP request failed (connect, timeout, body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The provider rejected the request.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Missing required environment variable.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// Message rejected before sending.
    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}
