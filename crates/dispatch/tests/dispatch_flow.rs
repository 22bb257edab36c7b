//! End-to-end behaviour of the dispatcher with recording channels.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use database::{Contact, EmergencyEvent, User};
use dispatch::{
    async_trait, AttemptOutcome, AuditEntry, AuditError, AuditSink, Channel, ChannelError,
    Delivery, DeliveryMode, DispatchConfig, Dispatcher, EmailChannel, FileAuditLog,
    MemoryAuditLog, SimulatedSms, SmsChannel, NO_NOTIFICATION_MESSAGE,
};

// ============================================================================
// Fakes
// ============================================================================

#[derive(Default)]
struct RecordingSms {
    calls: Mutex<Vec<(String, String)>>,
    fail_for: HashSet<String>,
}

impl RecordingSms {
    fn failing_for(numbers: &[&str]) -> Self {
        Self {
            fail_for: numbers.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }
    }

    fn destinations(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(to, _)| to.clone()).collect()
    }
}

#[async_trait]
impl SmsChannel for RecordingSms {
    async fn send_sms(&self, to: &str, body: &str) -> Result<Delivery, ChannelError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push((to.to_string(), body.to_string()));
        if self.fail_for.contains(to) {
            return Err(ChannelError::Transport(format!("carrier rejected {}", to)));
        }
        Ok(Delivery::Sent {
            id: format!("SM{}", calls.len()),
        })
    }

    fn is_live(&self) -> bool {
        true
    }
}

#[derive(Default)]
struct RecordingEmail {
    calls: Mutex<Vec<(String, String, String)>>,
    fail_all: bool,
}

impl RecordingEmail {
    fn recipients(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(to, _, _)| to.clone()).collect()
    }
}

#[async_trait]
impl EmailChannel for RecordingEmail {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<Delivery, ChannelError> {
        self.calls
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        if self.fail_all {
            return Err(ChannelError::Transport("smtp unavailable".to_string()));
        }
        Ok(Delivery::Sent {
            id: "250 queued".to_string(),
        })
    }

    fn is_live(&self) -> bool {
        true
    }
}

struct BrokenAudit;

#[async_trait]
impl AuditSink for BrokenAudit {
    async fn append(&self, _entry: &AuditEntry) -> Result<(), AuditError> {
        Err(AuditError::Backend("read-only filesystem".to_string()))
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn user(id: i64, username: &str) -> User {
    User {
        id,
        username: username.to_string(),
        email: None,
    }
}

fn contact(id: i64, user_id: i64, name: &str, phone: &str, email: &str) -> Contact {
    Contact {
        id,
        user_id,
        name: name.to_string(),
        phone: phone.to_string(),
        email: (!email.is_empty()).then(|| email.to_string()),
    }
}

fn event(id: i64, user_id: i64, trigger: &str) -> EmergencyEvent {
    EmergencyEvent {
        id,
        user_id,
        location: "12.9716,77.5946".to_string(),
        trigger_type: trigger.to_string(),
        status: "active".to_string(),
        created_at: "2026-10-16T09:30:00Z".to_string(),
    }
}

fn alice_and_bob() -> Vec<Contact> {
    vec![
        contact(1, 7, "Alice", "9876543210", "a@x.com"),
        contact(2, 7, "Bob", "0123456789", ""),
    ]
}

struct Harness {
    sms: Arc<RecordingSms>,
    email: Arc<RecordingEmail>,
    audit: Arc<MemoryAuditLog>,
    dispatcher: Dispatcher,
}

fn harness(sms: RecordingSms, email: RecordingEmail) -> Harness {
    let sms = Arc::new(sms);
    let email = Arc::new(email);
    let audit = Arc::new(MemoryAuditLog::new());
    let dispatcher = Dispatcher::new(sms.clone(), email.clone(), audit.clone());
    Harness {
        sms,
        email,
        audit,
        dispatcher,
    }
}

fn attempts_in_audit(entries: &[AuditEntry]) -> Vec<(String, Channel, String)> {
    entries
        .iter()
        .filter_map(|e| match e {
            AuditEntry::Attempt(a) => Some((
                a.contact_name.clone(),
                a.channel,
                a.outcome.as_str().to_string(),
            )),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_manual_trigger_notifies_every_contact() {
    let h = harness(RecordingSms::default(), RecordingEmail::default());

    let summary = h
        .dispatcher
        .dispatch(&user(7, "priya"), &alice_and_bob(), &event(100, 7, "manual"))
        .await;

    assert!(!summary.skipped);
    assert_eq!(summary.mode, DeliveryMode::Real);
    assert_eq!(h.sms.destinations(), vec!["+919876543210", "+91123456789"]);
    assert_eq!(h.email.recipients(), vec!["a@x.com"]);
    assert_eq!(summary.sms_sent, 2);
    assert_eq!(summary.email_sent, 1);
    assert_eq!(summary.attempts.len(), 3);
    assert_eq!(summary.message, "Emergency triggered");

    let (_, body) = &h.sms.calls.lock().unwrap()[0];
    assert!(body.starts_with("SOS! priya is in danger!"));
    assert!(body.contains("https://maps.google.com/?q=12.9716%2C77.5946"));

    let (_, subject, _) = &h.email.calls.lock().unwrap()[0];
    assert_eq!(subject, "SOS Alert: priya needs help");
}

#[tokio::test]
async fn test_audit_header_precedes_attempts_in_contact_order() {
    let h = harness(RecordingSms::default(), RecordingEmail::default());

    h.dispatcher
        .dispatch(&user(7, "priya"), &alice_and_bob(), &event(100, 7, "keyword"))
        .await;

    let entries = h.audit.entries();
    match &entries[0] {
        AuditEntry::Header(header) => {
            assert_eq!(header.event_id, 100);
            assert_eq!(header.trigger, "keyword");
            assert_eq!(header.username, "priya");
            assert_eq!(header.location, "12.9716,77.5946");
            assert_eq!(header.contact_count, 2);
        }
        other => panic!("expected header first, got {other:?}"),
    }

    assert_eq!(
        attempts_in_audit(&entries),
        vec![
            ("Alice".to_string(), Channel::Sms, "sent".to_string()),
            ("Alice".to_string(), Channel::Email, "sent".to_string()),
            ("Bob".to_string(), Channel::Sms, "sent".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_periodic_update_sends_nothing() {
    let h = harness(RecordingSms::default(), RecordingEmail::default());
    let contacts: Vec<Contact> = (1..=5)
        .map(|i| contact(i, 7, &format!("C{}", i), "9876543210", "c@x.com"))
        .collect();

    let summary = h
        .dispatcher
        .dispatch(&user(7, "priya"), &contacts, &event(101, 7, "periodic_update"))
        .await;

    assert!(summary.skipped);
    assert_eq!(summary.sms_sent, 0);
    assert!(summary.attempts.is_empty());
    assert_eq!(summary.message, NO_NOTIFICATION_MESSAGE);
    assert!(h.sms.destinations().is_empty());
    assert!(h.email.recipients().is_empty());
    assert!(h.audit.entries().is_empty());
}

#[tokio::test]
async fn test_failure_for_one_contact_does_not_stop_the_next() {
    let h = harness(
        RecordingSms::failing_for(&["+919876543210"]),
        RecordingEmail {
            fail_all: true,
            ..Default::default()
        },
    );

    let summary = h
        .dispatcher
        .dispatch(&user(7, "priya"), &alice_and_bob(), &event(102, 7, "manual"))
        .await;

    assert_eq!(h.sms.destinations(), vec!["+919876543210", "+91123456789"]);
    assert_eq!(summary.attempts.len(), 3);
    assert_eq!(summary.sms_sent, 1);
    assert_eq!(summary.email_sent, 0);
    assert_eq!(summary.failures().count(), 2);

    let alice_sms = &summary.attempts[0];
    assert_eq!(
        alice_sms.outcome,
        AttemptOutcome::Failed {
            detail: "carrier rejected +919876543210".to_string()
        }
    );
    assert_eq!(summary.attempts[2].outcome.as_str(), "sent");
}

#[tokio::test]
async fn test_incomplete_sms_credentials_is_simulation() {
    let email = Arc::new(RecordingEmail::default());
    let audit = Arc::new(MemoryAuditLog::new());
    let dispatcher = Dispatcher::new(Arc::new(SimulatedSms), email.clone(), audit.clone());

    let summary = dispatcher
        .dispatch(&user(7, "priya"), &alice_and_bob(), &event(103, 7, "voice"))
        .await;

    assert_eq!(summary.mode, DeliveryMode::Simulation);
    assert_eq!(summary.sms_sent, 0);
    // Attempts are still recorded, one per contact with a phone.
    assert_eq!(summary.attempts_on(Channel::Sms).count(), 2);
    assert!(summary
        .attempts_on(Channel::Sms)
        .all(|a| a.outcome == AttemptOutcome::Simulated));
    // Email is independent of SMS credentials.
    assert_eq!(email.recipients(), vec!["a@x.com"]);
    assert_eq!(summary.email_sent, 1);

    let notes: Vec<_> = audit
        .entries()
        .into_iter()
        .filter_map(|e| match e {
            AuditEntry::Note { text, .. } => Some(text),
            _ => None,
        })
        .collect();
    assert_eq!(notes, vec!["SMS credentials incomplete, SMS simulated"]);
}

#[tokio::test]
async fn test_zero_contacts_still_writes_header() {
    let h = harness(RecordingSms::default(), RecordingEmail::default());

    let summary = h
        .dispatcher
        .dispatch(&user(7, "priya"), &[], &event(104, 7, "voice"))
        .await;

    assert!(!summary.skipped);
    assert_eq!(summary.sms_sent, 0);
    assert!(summary.attempts.is_empty());
    assert_eq!(summary.message, "Emergency triggered, no contacts to notify");

    let entries = h.audit.entries();
    assert_eq!(entries.len(), 1);
    assert!(matches!(&entries[0], AuditEntry::Header(h) if h.contact_count == 0));
}

#[tokio::test]
async fn test_unknown_trigger_notifies_like_manual() {
    let h = harness(RecordingSms::default(), RecordingEmail::default());

    let summary = h
        .dispatcher
        .dispatch(&user(7, "priya"), &alice_and_bob(), &event(105, 7, "shake"))
        .await;

    assert!(!summary.skipped);
    assert_eq!(summary.trigger.as_str(), "shake");
    assert_eq!(summary.sms_sent, 2);
}

#[tokio::test]
async fn test_blank_destinations_are_skipped() {
    let h = harness(RecordingSms::default(), RecordingEmail::default());
    let contacts = vec![
        contact(1, 7, "NoPhone", "   ", "np@x.com"),
        contact(2, 7, "NoEmail", "9876543210", "  "),
        contact(3, 7, "Nothing", "", ""),
    ];

    let summary = h
        .dispatcher
        .dispatch(&user(7, "priya"), &contacts, &event(106, 7, "manual"))
        .await;

    assert_eq!(h.sms.destinations(), vec!["+919876543210"]);
    assert_eq!(h.email.recipients(), vec!["np@x.com"]);
    assert_eq!(summary.attempts.len(), 2);
}

#[tokio::test]
async fn test_contacts_of_other_users_are_never_notified() {
    let h = harness(RecordingSms::default(), RecordingEmail::default());
    let contacts = vec![
        contact(1, 7, "Mine", "9876543210", ""),
        contact(2, 8, "Stranger", "9000000000", "s@x.com"),
    ];

    let summary = h
        .dispatcher
        .dispatch(&user(7, "priya"), &contacts, &event(107, 7, "manual"))
        .await;

    assert_eq!(h.sms.destinations(), vec!["+919876543210"]);
    assert!(h.email.recipients().is_empty());
    assert_eq!(summary.attempts.len(), 1);

    let entries = h.audit.entries();
    assert!(matches!(&entries[0], AuditEntry::Header(h) if h.contact_count == 1));
    assert!(entries
        .iter()
        .any(|e| matches!(e, AuditEntry::Note { text, .. } if text.contains("not owned"))));
}

#[tokio::test]
async fn test_event_of_another_user_notifies_nobody() {
    let h = harness(RecordingSms::default(), RecordingEmail::default());

    let summary = h
        .dispatcher
        .dispatch(&user(8, "mallory"), &alice_and_bob(), &event(108, 7, "manual"))
        .await;

    assert!(summary.attempts.is_empty());
    assert!(h.sms.destinations().is_empty());
}

#[tokio::test]
async fn test_audit_failure_does_not_abort_dispatch() {
    let sms = Arc::new(RecordingSms::default());
    let dispatcher = Dispatcher::new(
        sms.clone(),
        Arc::new(RecordingEmail::default()),
        Arc::new(BrokenAudit),
    );

    let summary = dispatcher
        .dispatch(&user(7, "priya"), &alice_and_bob(), &event(109, 7, "manual"))
        .await;

    assert_eq!(summary.sms_sent, 2);
    assert_eq!(sms.destinations().len(), 2);
}

#[tokio::test]
async fn test_unconfigured_dispatcher_writes_simulation_audit_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sos_dispatch.log");
    let config = DispatchConfig::default();
    let dispatcher = Dispatcher::from_config(&config, Arc::new(FileAuditLog::new(&path))).unwrap();

    let summary = dispatcher
        .dispatch(&user(7, "priya"), &alice_and_bob(), &event(110, 7, "manual"))
        .await;

    assert_eq!(summary.mode, DeliveryMode::Simulation);
    assert_eq!(summary.sms_sent, 0);
    assert_eq!(summary.email_sent, 0);
    assert_eq!(summary.attempts.len(), 3);

    let log = tokio::fs::read_to_string(&path).await.unwrap();
    assert!(log.contains("EMERGENCY DISPATCH event=110"));
    assert!(log.contains("user: priya (id 7)"));
    assert!(log.contains("contacts: 2"));
    assert!(log.contains("note: no delivery credentials configured, running in simulation mode"));
    assert!(log.contains("sms -> Alice +919876543210: SIMULATED"));
    assert!(log.contains("email -> Alice a@x.com: SIMULATED"));
    assert!(log.contains("sms -> Bob +91123456789: SIMULATED"));
}

#[tokio::test]
async fn test_client_input_cannot_forge_audit_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sos_dispatch.log");
    let dispatcher = Dispatcher::from_config(
        &DispatchConfig::default(),
        Arc::new(FileAuditLog::new(&path)),
    )
    .unwrap();

    let mut event = event(111, 7, "x\ncontacts: 99");
    event.location =
        "1,2\n[2026-01-01T00:00:00Z] sms -> Mum +919876543210: SENT (SMforged)".to_string();
    let contacts = vec![contact(1, 7, "Mum", "9876543210", "")];

    dispatcher.dispatch(&user(7, "priya"), &contacts, &event).await;

    let log = tokio::fs::read_to_string(&path).await.unwrap();
    assert_eq!(log.lines().filter(|l| l.contains("SENT (SMforged)")).count(), 1);
    assert!(log.lines().all(|l| !l.starts_with("[2026-01-01T00:00:00Z]")));
    assert_eq!(log.lines().filter(|l| l.starts_with("contacts: ")).count(), 1);
    assert!(log.contains("contacts: 1\n"));
}
