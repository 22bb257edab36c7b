//! Per-contact, per-channel attempt records.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::channel::{Channel, ChannelError, Delivery};

/// How a single send turned out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum AttemptOutcome {
    Sent { id: String },
    Simulated,
    Failed { detail: String },
}

impl AttemptOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptOutcome::Sent { .. } => "sent",
            AttemptOutcome::Simulated => "simulated",
            AttemptOutcome::Failed { .. } => "failed",
        }
    }

    /// Transport identifier or failure detail.
    pub fn detail(&self) -> Option<&str> {
        match self {
            AttemptOutcome::Sent { id } => Some(id),
            AttemptOutcome::Simulated => None,
            AttemptOutcome::Failed { detail } => Some(detail),
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, AttemptOutcome::Sent { .. })
    }
}

impl From<Result<Delivery, ChannelError>> for AttemptOutcome {
    fn from(result: Result<Delivery, ChannelError>) -> Self {
        match result {
            Ok(Delivery::Sent { id }) => AttemptOutcome::Sent { id },
            Ok(Delivery::Simulated) => AttemptOutcome::Simulated,
            Err(err) => AttemptOutcome::Failed {
                detail: err.to_string(),
            },
        }
    }
}

/// One notification attempt. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchAttempt {
    pub event_id: i64,
    pub contact_id: i64,
    pub contact_name: String,
    pub channel: Channel,
    /// Normalized phone number or trimmed email address.
    pub destination: String,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
    pub at: DateTime<Utc>,
}
