//! Audit sink backed by the `dispatch_attempts` table.

use database::dispatch_attempt;
use database::{Database, NewDispatchAttempt};
use dispatch::{async_trait, AuditEntry, AuditError, AuditSink};

/// Persists every attempt as a row. Headers and notes live in the text log.
#[derive(Debug, Clone)]
pub struct DatabaseAuditSink {
    db: Database,
}

impl DatabaseAuditSink {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuditSink for DatabaseAuditSink {
    async fn append(&self, entry: &AuditEntry) -> Result<(), AuditError> {
        let AuditEntry::Attempt(attempt) = entry else {
            return Ok(());
        };

        let row = NewDispatchAttempt {
            event_id: attempt.event_id,
            contact_id: Some(attempt.contact_id),
            contact_name: &attempt.contact_name,
            channel: attempt.channel.as_str(),
            destination: &attempt.destination,
            outcome: attempt.outcome.as_str(),
            detail: attempt.outcome.detail(),
        };

        dispatch_attempt::record_attempt(self.db.pool(), &row)
            .await
            .map(|_| ())
            .map_err(|err| AuditError::Backend(err.to_string()))
    }
}
