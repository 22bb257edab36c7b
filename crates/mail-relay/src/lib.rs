//! # mail-relay
//!
//! SMTP client for sending plain-text alert email through any relay
//! (a hosted provider, or a local relay in development).
//!
//! ```no_run
//! use mail_relay::{Email, MailClient, MailConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mail_relay::MailError> {
//!     let config = MailConfig::from_env()?;
//!     let client = MailClient::new(config)?;
//!
//!     let email = Email::new("contact@example.com", "SOS Alert", "Please call me.");
//!     client.send(&email).await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod types;

pub use client::MailClient;
pub use config::{MailConfig, DEFAULT_SMTP_PORT};
pub use error::MailError;
pub use types::{Email, MailReceipt};
