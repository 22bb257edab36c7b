//! Emergency notification dispatch for SafeWalk.
//!
//! Given a recorded [`EmergencyEvent`](database::EmergencyEvent), the
//! [`Dispatcher`] decides whether the trigger warrants notification, then
//! notifies each of the user's contacts by SMS and email, one attempt per
//! contact per channel, recording every outcome to an audit trail.
//!
//! A failure for one contact or channel never stops the others, and
//! missing transport credentials degrade to a simulated channel rather than
//! an error.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use dispatch::{DispatchConfig, Dispatcher, FileAuditLog};
//!
//! # async fn example(
//! #     user: database::User,
//! #     contacts: Vec<database::Contact>,
//! #     event: database::EmergencyEvent,
//! # ) -> Result<(), dispatch::DispatchError> {
//! let config = DispatchConfig::from_env()?;
//! let audit = Arc::new(FileAuditLog::new("logs/sos_dispatch.log"));
//! let dispatcher = Dispatcher::from_config(&config, audit)?;
//!
//! let summary = dispatcher.dispatch(&user, &contacts, &event).await;
//! println!("{} SMS sent ({})", summary.sms_sent, summary.mode.as_str());
//! # Ok(())
//! # }
//! ```

mod attempt;
mod audit;
mod channel;
mod config;
mod dispatcher;
mod error;
mod message;
mod phone;
mod trigger;

pub use attempt::{AttemptOutcome, DispatchAttempt};
pub use audit::{
    render_entry, AuditEntry, AuditError, AuditFanout, AuditSink, DispatchHeader, FileAuditLog,
    MemoryAuditLog,
};
pub use channel::{
    Channel, ChannelError, Delivery, EmailChannel, LiveEmail, LiveSms, SimulatedEmail,
    SimulatedSms, SmsChannel,
};
pub use config::DispatchConfig;
pub use dispatcher::{DeliveryMode, DispatchSummary, Dispatcher, NO_NOTIFICATION_MESSAGE};
pub use error::DispatchError;
pub use message::{AlertTemplate, DEFAULT_MAP_BASE_URL, MAX_SMS_LOCATION_CHARS};
pub use phone::{CountryCode, PhoneNormalizer, DEFAULT_COUNTRY_CODE};
pub use trigger::TriggerType;

// Re-export the async-trait macro for channel implementors.
pub use async_trait::async_trait;
