//! SMS gateway client library.
//!
//! This crate provides a Rust client for sending text messages through a
//! Twilio-compatible REST API (`POST /2010-04-01/Accounts/{sid}/Messages.json`).
//!
//! # Example
//!
//! ```no_run
//! use sms_gateway::{SmsClient, SmsConfig};
//!
//! # async fn example() -> Result<(), sms_gateway::SmsError> {
//! let config = SmsConfig::from_env()?;
//! let client = SmsClient::new(config)?;
//!
//! let receipt = client.send_text("+919876543210", "Hello!").await?;
//! println!("Queued as {}", receipt.sid);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::SmsClient;
pub use config::{SmsConfig, DEFAULT_API_BASE};
pub use error::SmsError;
pub use types::{MessageReceipt, OutboundSms};
