//! Notification channels.
//!
//! Each channel is a trait with a live implementation wrapping a real
//! transport and a simulated one used when that transport is not configured.
//! The orchestrator never branches on credentials; it asks the channel.

use async_trait::async_trait;
use mail_relay::{Email, MailClient, MailError};
use serde::Serialize;
use sms_gateway::{SmsClient, SmsError};
use thiserror::Error;
use tracing::info;

/// Which transport an attempt went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Sms,
    Email,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Sms => "sms",
            Channel::Email => "email",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a send that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to the transport; `id` is the transport's identifier.
    Sent { id: String },
    /// Logged only, nothing transmitted.
    Simulated,
}

/// A transport-level send failure.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error(transparent)]
    Sms(#[from] SmsError),

    #[error(transparent)]
    Mail(#[from] MailError),

    /// Failure reported by some other transport implementation.
    #[error("{0}")]
    Transport(String),
}

/// Sends text messages.
#[async_trait]
pub trait SmsChannel: Send + Sync {
    /// Send `body` to an already-normalized number. One attempt, no retry.
    async fn send_sms(&self, to: &str, body: &str) -> Result<Delivery, ChannelError>;

    /// Whether messages actually leave the system.
    fn is_live(&self) -> bool;
}

/// Sends email.
#[async_trait]
pub trait EmailChannel: Send + Sync {
    /// Send a plain-text email. One attempt, no retry.
    async fn send_email(&self, to: &str, subject: &str, body: &str)
        -> Result<Delivery, ChannelError>;

    /// Whether messages actually leave the system.
    fn is_live(&self) -> bool;
}

/// SMS through the configured provider.
#[derive(Debug, Clone)]
pub struct LiveSms {
    client: SmsClient,
}

impl LiveSms {
    pub fn new(client: SmsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SmsChannel for LiveSms {
    async fn send_sms(&self, to: &str, body: &str) -> Result<Delivery, ChannelError> {
        let receipt = self.client.send_text(to, body).await?;
        Ok(Delivery::Sent { id: receipt.sid })
    }

    fn is_live(&self) -> bool {
        true
    }
}

/// SMS stand-in used when provider credentials are incomplete.
#[derive(Debug, Clone, Default)]
pub struct SimulatedSms;

#[async_trait]
impl SmsChannel for SimulatedSms {
    async fn send_sms(&self, to: &str, body: &str) -> Result<Delivery, ChannelError> {
        info!(to = %to, body = %body, "[simulated] SMS not sent, credentials missing");
        Ok(Delivery::Simulated)
    }

    fn is_live(&self) -> bool {
        false
    }
}

/// Email through the configured SMTP relay.
#[derive(Debug, Clone)]
pub struct LiveEmail {
    client: MailClient,
}

impl LiveEmail {
    pub fn new(client: MailClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EmailChannel for LiveEmail {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<Delivery, ChannelError> {
        let receipt = self.client.send(&Email::new(to, subject, body)).await?;
        Ok(Delivery::Sent {
            id: receipt.to_string(),
        })
    }

    fn is_live(&self) -> bool {
        true
    }
}

/// Email stand-in used when no mail transport is configured.
#[derive(Debug, Clone, Default)]
pub struct SimulatedEmail;

#[async_trait]
impl EmailChannel for SimulatedEmail {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        _body: &str,
    ) -> Result<Delivery, ChannelError> {
        info!(to = %to, subject = %subject, "[simulated] email not sent, mail transport missing");
        Ok(Delivery::Simulated)
    }

    fn is_live(&self) -> bool {
        false
    }
}
