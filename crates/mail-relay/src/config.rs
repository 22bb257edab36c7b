use secrecy::{ExposeSecret, SecretString};
use std::env;

use crate::MailError;

/// Default SMTP submission port.
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Configuration for connecting to an SMTP relay.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// SMTP host
    pub smtp_host: String,
    /// SMTP port (default: 587)
    pub smtp_port: u16,
    /// Upgrade the connection with STARTTLS (default: true)
    pub use_tls: bool,
    /// Address alert email is sent from
    pub sender: String,
    /// Login name, if the relay requires authentication
    pub username: Option<String>,
    password: Option<SecretString>,
}

impl MailConfig {
    /// Create an unauthenticated STARTTLS configuration.
    pub fn new(smtp_host: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            smtp_host: smtp_host.into(),
            smtp_port: DEFAULT_SMTP_PORT,
            use_tls: true,
            sender: sender.into(),
            username: None,
            password: None,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Required:
    /// - `MAIL_SERVER` - SMTP host
    /// - `MAIL_SENDER` - From address (falls back to `MAIL_USERNAME`)
    ///
    /// Optional (with defaults):
    /// - `MAIL_PORT` - Default: 587
    /// - `MAIL_USE_TLS` - Default: true
    /// - `MAIL_USERNAME` / `MAIL_PASSWORD` - both or neither
    pub fn from_env() -> Result<Self, MailError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MailError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let smtp_host =
            get("MAIL_SERVER").ok_or_else(|| MailError::MissingEnvVar("MAIL_SERVER".to_string()))?;

        let smtp_port = match get("MAIL_PORT") {
            Some(port) => port
                .parse::<u16>()
                .map_err(|e| MailError::Config(format!("Invalid MAIL_PORT: {}", e)))?,
            None => DEFAULT_SMTP_PORT,
        };

        let use_tls = match get("MAIL_USE_TLS") {
            Some(flag) => parse_bool(&flag)
                .ok_or_else(|| MailError::Config(format!("Invalid MAIL_USE_TLS: {}", flag)))?,
            None => true,
        };

        let username = get("MAIL_USERNAME");
        let password = get("MAIL_PASSWORD");
        if username.is_some() != password.is_some() {
            return Err(MailError::Config(
                "MAIL_USERNAME and MAIL_PASSWORD must be set together".to_string(),
            ));
        }

        let sender = get("MAIL_SENDER")
            .or_else(|| username.clone())
            .ok_or_else(|| MailError::MissingEnvVar("MAIL_SENDER".to_string()))?;

        Ok(Self {
            smtp_host,
            smtp_port,
            use_tls,
            sender,
            username,
            password: password.map(SecretString::from),
        })
    }

    /// Builder method to set SMTP port.
    pub fn with_smtp_port(mut self, port: u16) -> Self {
        self.smtp_port = port;
        self
    }

    /// Builder method to toggle STARTTLS.
    pub fn with_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    /// Builder method to set login credentials.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Login pair, if configured (exposes the secret).
    pub(crate) fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.expose_secret())),
            _ => None,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
