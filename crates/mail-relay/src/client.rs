use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{info, instrument};

use crate::{Email, MailConfig, MailError, MailReceipt};

/// Client for sending email through an SMTP relay.
///
/// Uses connection pooling; no connection is opened until the first send.
#[derive(Clone)]
pub struct MailClient {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl MailClient {
    /// Create a new client with the given configuration.
    pub fn new(config: MailConfig) -> Result<Self, MailError> {
        let from: Mailbox = config
            .sender
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("From '{}': {}", config.sender, e)))?;

        let mut builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| MailError::Transport(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
        }
        .port(config.smtp_port);

        if let Some((username, password)) = config.credentials() {
            builder =
                builder.credentials(Credentials::new(username.to_string(), password.to_string()));
        }

        info!(
            host = %config.smtp_host,
            port = config.smtp_port,
            tls = config.use_tls,
            sender = %config.sender,
            "Created SMTP client"
        );

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    /// Send an email.
    #[instrument(skip(self, email), fields(to = %email.to, subject = %email.subject))]
    pub async fn send(&self, email: &Email) -> Result<MailReceipt, MailError> {
        let message = self.build_message(email)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| MailError::Send(e.to_string()))?;

        let receipt = MailReceipt {
            code: response.code().to_string(),
            message: response
                .message()
                .next()
                .map(|line| line.to_string())
                .unwrap_or_default(),
        };

        info!(to = %email.to, receipt = %receipt, "Email sent successfully");
        Ok(receipt)
    }

    /// Build a lettre Message from our Email type.
    fn build_message(&self, email: &Email) -> Result<Message, MailError> {
        let to: Mailbox = email
            .to
            .trim()
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("To '{}': {}", email.to, e)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| MailError::BuildEmail(e.to_string()))
    }
}

impl std::fmt::Debug for MailClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailClient").field("from", &self.from.to_string()).finish()
    }
}
