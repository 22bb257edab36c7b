//! SMS provider HTTP client.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument};

use crate::config::SmsConfig;
use crate::error::SmsError;
use crate::types::{ApiErrorBody, MessageReceipt, OutboundSms};

/// Maximum message body accepted by the provider (concatenated segments).
pub const MAX_BODY_CHARS: usize = 1600;

/// Client for the SMS provider's REST API.
#[derive(Clone)]
pub struct SmsClient {
    http: Client,
    config: SmsConfig,
}

impl SmsClient {
    /// Create a new client. No request is made until the first send.
    pub fn new(config: SmsConfig) -> Result<Self, SmsError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(SmsError::Http)?;

        info!(
            api_base = %config.api_base,
            from = %config.from_number,
            "Created SMS gateway client"
        );

        Ok(Self { http, config })
    }

    /// Send a text message to a single recipient.
    #[instrument(skip(self, body), fields(to = %to))]
    pub async fn send_text(&self, to: &str, body: &str) -> Result<MessageReceipt, SmsError> {
        let message = self.build_message(to, body)?;
        let url = self.config.messages_url();

        debug!(url = %url, "Creating message");

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(self.config.auth_token()))
            .form(&message)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        let receipt = parse_response(status, &text)?;
        info!(sid = %receipt.sid, status = ?receipt.status, "SMS accepted by provider");
        Ok(receipt)
    }

    /// Get the configuration.
    pub fn config(&self) -> &SmsConfig {
        &self.config
    }

    fn build_message(&self, to: &str, body: &str) -> Result<OutboundSms, SmsError> {
        if to.trim().is_empty() {
            return Err(SmsError::InvalidMessage("empty destination".to_string()));
        }
        if body.is_empty() {
            return Err(SmsError::InvalidMessage("empty body".to_string()));
        }
        let chars = body.chars().count();
        if chars > MAX_BODY_CHARS {
            return Err(SmsError::InvalidMessage(format!(
                "body is {} chars, max {}",
                chars, MAX_BODY_CHARS
            )));
        }

        Ok(OutboundSms {
            to: to.trim().to_string(),
            from: self.config.from_number.clone(),
            body: body.to_string(),
        })
    }
}

/// Turn a provider response into a receipt or a typed error.
pub(crate) fn parse_response(status: StatusCode, body: &str) -> Result<MessageReceipt, SmsError> {
    if status.is_success() {
        return serde_json::from_str(body).map_err(SmsError::Json);
    }

    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(err) => Err(SmsError::Api {
            status: status.as_u16(),
            code: err.code,
            message: err.message,
        }),
        Err(_) => Err(SmsError::Api {
            status: status.as_u16(),
            code: None,
            message: if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                body.trim().to_string()
            },
        }),
    }
}

impl std::fmt::Debug for SmsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsClient")
            .field("config", &self.config)
            .finish()
    }
}
