//! The dispatch orchestrator.
//!
//! ```text
//! EmergencyEvent (already persisted)
//!          ↓
//!  trigger gate ── periodic_update ──→ skipped summary
//!          ↓
//!  audit header (+ simulation notes)
//!          ↓
//!  for each owned contact, in order:
//!     phone? → normalize → SMS   → audit attempt
//!     email? →             email → audit attempt
//!          ↓
//!  DispatchSummary
//! ```

use std::sync::Arc;

use chrono::Utc;
use database::models::{Contact, EmergencyEvent, User};
use mail_relay::MailClient;
use serde::Serialize;
use sms_gateway::SmsClient;
use tracing::{info, instrument, warn};

use crate::attempt::{AttemptOutcome, DispatchAttempt};
use crate::audit::{AuditEntry, AuditSink, DispatchHeader};
use crate::channel::{
    Channel, EmailChannel, LiveEmail, LiveSms, SimulatedEmail, SimulatedSms, SmsChannel,
};
use crate::config::DispatchConfig;
use crate::error::DispatchError;
use crate::message::AlertTemplate;
use crate::phone::PhoneNormalizer;
use crate::trigger::TriggerType;

/// Message returned when the trigger gate suppresses notification.
pub const NO_NOTIFICATION_MESSAGE: &str = "Location updated, no notification needed";

/// Whether SMS actually leaves the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    Real,
    Simulation,
}

impl DeliveryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMode::Real => "real",
            DeliveryMode::Simulation => "simulation",
        }
    }
}

/// Aggregate result of one dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchSummary {
    pub event_id: i64,
    pub trigger: TriggerType,
    /// True when the trigger gate suppressed notification.
    pub skipped: bool,
    pub mode: DeliveryMode,
    /// Successful live SMS sends; the headline count.
    pub sms_sent: usize,
    /// Successful live email sends; informational only.
    pub email_sent: usize,
    /// Every attempt, in the order it was made.
    pub attempts: Vec<DispatchAttempt>,
    pub message: String,
}

impl DispatchSummary {
    fn skipped(event_id: i64, trigger: TriggerType, mode: DeliveryMode) -> Self {
        Self {
            event_id,
            trigger,
            skipped: true,
            mode,
            sms_sent: 0,
            email_sent: 0,
            attempts: Vec::new(),
            message: NO_NOTIFICATION_MESSAGE.to_string(),
        }
    }

    /// Attempts made through one channel.
    pub fn attempts_on(&self, channel: Channel) -> impl Iterator<Item = &DispatchAttempt> {
        self.attempts.iter().filter(move |a| a.channel == channel)
    }

    /// Attempts that failed at the transport.
    pub fn failures(&self) -> impl Iterator<Item = &DispatchAttempt> {
        self.attempts
            .iter()
            .filter(|a| matches!(a.outcome, AttemptOutcome::Failed { .. }))
    }
}

/// Fans an emergency out to a user's contacts over SMS and email.
#[derive(Clone)]
pub struct Dispatcher {
    sms: Arc<dyn SmsChannel>,
    email: Arc<dyn EmailChannel>,
    audit: Arc<dyn AuditSink>,
    normalizer: PhoneNormalizer,
    template: AlertTemplate,
}

impl Dispatcher {
    /// Create a dispatcher from explicit channels.
    pub fn new(
        sms: Arc<dyn SmsChannel>,
        email: Arc<dyn EmailChannel>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            sms,
            email,
            audit,
            normalizer: PhoneNormalizer::default(),
            template: AlertTemplate::default(),
        }
    }

    /// Create a dispatcher, choosing live or simulated channels from config.
    pub fn from_config(
        config: &DispatchConfig,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self, DispatchError> {
        let sms: Arc<dyn SmsChannel> = match &config.sms {
            Some(sms) => Arc::new(LiveSms::new(SmsClient::new(sms.clone())?)),
            None => Arc::new(SimulatedSms),
        };

        let email: Arc<dyn EmailChannel> = match &config.mail {
            Some(mail) => Arc::new(LiveEmail::new(MailClient::new(mail.clone())?)),
            None => Arc::new(SimulatedEmail),
        };

        let dispatcher = Self::new(sms, email, audit)
            .with_normalizer(PhoneNormalizer::new(config.country_code.clone()))
            .with_template(AlertTemplate::new(config.map_base_url()));

        info!(
            mode = dispatcher.mode().as_str(),
            email_live = dispatcher.email.is_live(),
            country_code = %config.country_code,
            "Dispatcher ready"
        );

        Ok(dispatcher)
    }

    /// Builder method to set the phone normalizer.
    pub fn with_normalizer(mut self, normalizer: PhoneNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Builder method to set the message template.
    pub fn with_template(mut self, template: AlertTemplate) -> Self {
        self.template = template;
        self
    }

    /// `Real` iff the SMS channel is live. Email does not affect the mode.
    pub fn mode(&self) -> DeliveryMode {
        if self.sms.is_live() {
            DeliveryMode::Real
        } else {
            DeliveryMode::Simulation
        }
    }

    /// Notify `user`'s contacts about `event`.
    ///
    /// Never fails: transport errors become failed attempts, audit errors are
    /// logged, and contacts not owned by the event's user are left out.
    #[instrument(skip_all, fields(event_id = event.id, user_id = user.id))]
    pub async fn dispatch(
        &self,
        user: &User,
        contacts: &[Contact],
        event: &EmergencyEvent,
    ) -> DispatchSummary {
        let trigger = TriggerType::parse(&event.trigger_type);
        let mode = self.mode();

        if !trigger.requires_notification() {
            info!(trigger = %trigger, "Trigger does not notify contacts");
            return DispatchSummary::skipped(event.id, trigger, mode);
        }

        let owner_matches = user.id == event.user_id;
        let (owned, foreign): (Vec<&Contact>, Vec<&Contact>) = contacts
            .iter()
            .partition(|c| owner_matches && c.user_id == event.user_id);

        info!(
            trigger = %trigger,
            location = %event.location,
            contacts = owned.len(),
            mode = mode.as_str(),
            "Emergency alert received, notifying contacts"
        );

        self.audit(&AuditEntry::Header(DispatchHeader {
            event_id: event.id,
            at: Utc::now(),
            trigger: trigger.as_str().to_string(),
            user_id: user.id,
            username: user.username.clone(),
            location: event.location.clone(),
            contact_count: owned.len(),
        }))
        .await;

        if !foreign.is_empty() {
            warn!(excluded = foreign.len(), "Contacts not owned by the event's user were excluded");
            self.audit(&AuditEntry::note(
                event.id,
                format!("{} contact(s) not owned by the triggering user excluded", foreign.len()),
            ))
            .await;
        }

        match (self.sms.is_live(), self.email.is_live()) {
            (false, false) => {
                self.audit(&AuditEntry::note(
                    event.id,
                    "no delivery credentials configured, running in simulation mode",
                ))
                .await
            }
            (false, true) => {
                self.audit(&AuditEntry::note(event.id, "SMS credentials incomplete, SMS simulated"))
                    .await
            }
            (true, false) => {
                self.audit(&AuditEntry::note(
                    event.id,
                    "mail transport not configured, email simulated",
                ))
                .await
            }
            (true, true) => {}
        }

        if owned.is_empty() {
            warn!("No contacts found, nobody to notify");
        }

        let sms_body = self.template.sms_body(&user.username, &event.location);
        let subject = self.template.email_subject(&user.username);
        let email_body = self
            .template
            .email_body(&user.username, &event.location, trigger.as_str());

        let mut attempts = Vec::new();

        for contact in owned {
            let phone = contact.phone.trim();
            if !phone.is_empty() {
                let to = self.normalizer.normalize(phone);
                let outcome = AttemptOutcome::from(self.sms.send_sms(&to, &sms_body).await);
                self.record(event.id, contact, Channel::Sms, to, outcome, &mut attempts)
                    .await;
            }

            let email = contact.email.as_deref().map(str::trim).unwrap_or_default();
            if !email.is_empty() {
                let outcome =
                    AttemptOutcome::from(self.email.send_email(email, &subject, &email_body).await);
                self.record(
                    event.id,
                    contact,
                    Channel::Email,
                    email.to_string(),
                    outcome,
                    &mut attempts,
                )
                .await;
            }
        }

        let sent_on = |channel: Channel| {
            attempts
                .iter()
                .filter(|a| a.channel == channel && a.outcome.is_sent())
                .count()
        };
        let sms_sent = sent_on(Channel::Sms);
        let email_sent = sent_on(Channel::Email);

        info!(
            attempts = attempts.len(),
            sms_sent,
            email_sent,
            "Dispatch complete"
        );

        let message = if attempts.is_empty() {
            "Emergency triggered, no contacts to notify".to_string()
        } else {
            "Emergency triggered".to_string()
        };

        DispatchSummary {
            event_id: event.id,
            trigger,
            skipped: false,
            mode,
            sms_sent,
            email_sent,
            attempts,
            message,
        }
    }

    async fn record(
        &self,
        event_id: i64,
        contact: &Contact,
        channel: Channel,
        destination: String,
        outcome: AttemptOutcome,
        attempts: &mut Vec<DispatchAttempt>,
    ) {
        match &outcome {
            AttemptOutcome::Failed { detail } => warn!(
                contact = %contact.name,
                channel = %channel,
                destination = %destination,
                error = %detail,
                "Notification failed"
            ),
            _ => info!(
                contact = %contact.name,
                channel = %channel,
                destination = %destination,
                outcome = outcome.as_str(),
                "Notification attempted"
            ),
        }

        let attempt = DispatchAttempt {
            event_id,
            contact_id: contact.id,
            contact_name: contact.name.clone(),
            channel,
            destination,
            outcome,
            at: Utc::now(),
        };

        self.audit(&AuditEntry::Attempt(attempt.clone())).await;
        attempts.push(attempt);
    }

    async fn audit(&self, entry: &AuditEntry) {
        if let Err(err) = self.audit.append(entry).await {
            warn!(event_id = entry.event_id(), error = %err, "Audit write failed");
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("mode", &self.mode())
            .field("email_live", &self.email.is_live())
            .field("normalizer", &self.normalizer)
            .finish()
    }
}
