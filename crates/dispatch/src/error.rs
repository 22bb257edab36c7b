//! Error types for dispatch setup.
//!
//! Dispatch itself never fails; these errors only arise while building a
//! [`crate::Dispatcher`] from configuration.

use thiserror::Error;

/// Errors that can occur while configuring dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Country calling code is not `+` followed by 1-4 digits.
    #[error("invalid country calling code '{0}' (expected e.g. +91)")]
    InvalidCountryCode(String),

    /// Map link base is not an http(s) URL.
    #[error("invalid map base URL '{0}'")]
    InvalidMapBaseUrl(String),

    /// SMS transport could not be configured.
    #[error("SMS configuration error: {0}")]
    Sms(#[from] sms_gateway::SmsError),

    /// Mail transport could not be configured.
    #[error("mail configuration error: {0}")]
    Mail(#[from] mail_relay::MailError),
}
