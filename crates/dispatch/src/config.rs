//! Dispatch configuration.
//!
//! Built once at startup and handed to [`crate::Dispatcher`]. Channel
//! settings are optional: leaving them out selects the simulated channel.

use std::env;

use mail_relay::{MailConfig, MailError};
use sms_gateway::{SmsConfig, SmsError};
use tracing::{info, warn};

use crate::error::DispatchError;
use crate::message::DEFAULT_MAP_BASE_URL;
use crate::phone::CountryCode;

/// Everything the dispatcher needs to pick and drive its channels.
#[derive(Debug, Clone, Default)]
pub struct DispatchConfig {
    /// SMS provider settings; `None` means SMS is simulated.
    pub sms: Option<SmsConfig>,
    /// SMTP relay settings; `None` means email is simulated.
    pub mail: Option<MailConfig>,
    /// Calling code used by the phone normalizer.
    pub country_code: CountryCode,
    /// Prefix the URL-encoded location is appended to.
    pub map_base_url: Option<String>,
}

impl DispatchConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `TWILIO_ACCOUNT_SID` / `TWILIO_AUTH_TOKEN` / `TWILIO_FROM_NUMBER` | SMS credentials | unset (simulated) |
    /// | `TWILIO_API_BASE` | SMS API base | `https://api.twilio.com` |
    /// | `MAIL_SERVER`, `MAIL_SENDER`, ... | SMTP relay | unset (simulated) |
    /// | `SAFEWALK_COUNTRY_CODE` | calling code | `+91` |
    /// | `SAFEWALK_MAP_BASE_URL` | map link prefix | `https://maps.google.com/?q=` |
    ///
    /// Missing values are fine; malformed ones are errors.
    pub fn from_env() -> Result<Self, DispatchError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DispatchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let sms = match SmsConfig::from_lookup(&lookup) {
            Ok(config) => Some(config),
            Err(SmsError::MissingEnvVar(var)) => {
                info!(missing = %var, "SMS credentials incomplete, SMS will be simulated");
                None
            }
            Err(err) => return Err(err.into()),
        };

        let mail = match MailConfig::from_lookup(&lookup) {
            Ok(config) => Some(config),
            Err(MailError::MissingEnvVar(var)) => {
                info!(missing = %var, "Mail transport not configured, email will be simulated");
                None
            }
            Err(err) => return Err(err.into()),
        };

        let country_code = match lookup("SAFEWALK_COUNTRY_CODE").filter(|v| !v.trim().is_empty()) {
            Some(code) => code.parse()?,
            None => CountryCode::default(),
        };

        let map_base_url = lookup("SAFEWALK_MAP_BASE_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        if let Some(url) = &map_base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(DispatchError::InvalidMapBaseUrl(url.clone()));
            }
        }

        if sms.is_none() && mail.is_none() {
            warn!("No delivery credentials configured, all notifications will be simulated");
        }

        Ok(Self {
            sms,
            mail,
            country_code,
            map_base_url,
        })
    }

    /// Whether real SMS delivery is configured.
    pub fn sms_configured(&self) -> bool {
        self.sms.is_some()
    }

    /// Whether real email delivery is configured.
    pub fn mail_configured(&self) -> bool {
        self.mail.is_some()
    }

    /// Map link prefix, falling back to the default.
    pub fn map_base_url(&self) -> &str {
        self.map_base_url.as_deref().unwrap_or(DEFAULT_MAP_BASE_URL)
    }
}
