//! Configuration types for sms-gateway.

use std::env;

use secrecy::{ExposeSecret, SecretString};

use crate::error::SmsError;

/// Default REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.twilio.com";

/// Credentials and endpoint for the SMS provider.
#[derive(Debug, Clone)]
pub struct SmsConfig {
    /// Base URL of the REST API (no trailing slash needed).
    pub api_base: String,
    /// Account identifier, also the basic-auth username.
    pub account_sid: String,
    /// Number (or sender ID) messages are sent from.
    pub from_number: String,
    /// Account auth token.
    auth_token: SecretString,
}

impl SmsConfig {
    /// Create a configuration against the default API base.
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from_number: impl Into<String>,
    ) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            account_sid: account_sid.into(),
            from_number: from_number.into(),
            auth_token: SecretString::from(auth_token.into()),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Required (blank values count as missing):
    /// - `TWILIO_ACCOUNT_SID`
    /// - `TWILIO_AUTH_TOKEN`
    /// - `TWILIO_FROM_NUMBER`
    ///
    /// Optional:
    /// - `TWILIO_API_BASE` - Default: `https://api.twilio.com`
    pub fn from_env() -> Result<Self, SmsError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SmsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| SmsError::MissingEnvVar(key.to_string()))
        };

        let account_sid = required("TWILIO_ACCOUNT_SID")?;
        let auth_token = required("TWILIO_AUTH_TOKEN")?;
        let from_number = required("TWILIO_FROM_NUMBER")?;

        let api_base = lookup("TWILIO_API_BASE")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
            return Err(SmsError::Config(format!(
                "TWILIO_API_BASE must be an http(s) URL, got '{}'",
                api_base
            )));
        }

        Ok(Self {
            api_base,
            account_sid,
            from_number,
            auth_token: SecretString::from(auth_token),
        })
    }

    /// Builder method to point at a different API base (e.g. a test double).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Get the auth token (exposes the secret).
    pub(crate) fn auth_token(&self) -> &str {
        self.auth_token.expose_secret()
    }

    /// Get the message creation endpoint URL.
    pub fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base.trim_end_matches('/'),
            urlencoding::encode(&self.account_sid)
        )
    }
}
