//! Append-only audit trail of dispatches.
//!
//! Sinks are best-effort: the orchestrator logs a failed append and carries
//! on, because the emergency event itself is already recorded.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::attempt::{AttemptOutcome, DispatchAttempt};

const BLOCK_SEPARATOR: &str = "==================================================";

/// Errors from an audit sink.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("audit backend error: {0}")]
    Backend(String),
}

/// Written once per notified event, before any channel is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchHeader {
    pub event_id: i64,
    pub at: DateTime<Utc>,
    pub trigger: String,
    pub user_id: i64,
    pub username: String,
    pub location: String,
    pub contact_count: usize,
}

/// One audit record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEntry {
    Header(DispatchHeader),
    Attempt(DispatchAttempt),
    Note {
        event_id: i64,
        at: DateTime<Utc>,
        text: String,
    },
}

impl AuditEntry {
    pub fn note(event_id: i64, text: impl Into<String>) -> Self {
        AuditEntry::Note {
            event_id,
            at: Utc::now(),
            text: text.into(),
        }
    }

    pub fn event_id(&self) -> i64 {
        match self {
            AuditEntry::Header(header) => header.event_id,
            AuditEntry::Attempt(attempt) => attempt.event_id,
            AuditEntry::Note { event_id, .. } => *event_id,
        }
    }
}

/// Destination for audit entries.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, entry: &AuditEntry) -> Result<(), AuditError>;
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Render an entry as complete text lines, newline-terminated.
pub fn render_entry(entry: &AuditEntry) -> String {
    let mut out = String::new();
    match entry {
        AuditEntry::Header(h) => {
            let _ = writeln!(out, "{}", BLOCK_SEPARATOR);
            let _ = writeln!(out, "[{}] EMERGENCY DISPATCH event={}", timestamp(&h.at), h.event_id);
            let _ = writeln!(out, "trigger: {}", single_line(&h.trigger));
            let _ = writeln!(out, "user: {} (id {})", single_line(&h.username), h.user_id);
            let _ = writeln!(out, "location: {}", single_line(&h.location));
            let _ = writeln!(out, "contacts: {}", h.contact_count);
        }
        AuditEntry::Attempt(a) => {
            let result = match &a.outcome {
                AttemptOutcome::Sent { id } => format!("SENT ({})", single_line(id)),
                AttemptOutcome::Simulated => "SIMULATED".to_string(),
                AttemptOutcome::Failed { detail } => format!("FAILED ({})", single_line(detail)),
            };
            let _ = writeln!(
                out,
                "[{}] {} -> {} {}: {}",
                timestamp(&a.at),
                a.channel,
                single_line(&a.contact_name),
                single_line(&a.destination),
                result
            );
        }
        AuditEntry::Note { at, text, .. } => {
            let _ = writeln!(out, "[{}] note: {}", timestamp(at), single_line(text));
        }
    }
    out
}

/// Collapse whitespace and control characters so a field can never start a
/// new record line.
fn single_line(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Plain-text audit file.
///
/// The file is opened lazily in append mode, so a missing or unwritable
/// location only produces per-entry errors. Each entry goes out in a single
/// `write_all` while holding the lock, which keeps concurrent dispatches
/// from interleaving inside a line.
#[derive(Debug)]
pub struct FileAuditLog {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl FileAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn open(&self) -> Result<File, AuditError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        Ok(file)
    }
}

#[async_trait]
impl AuditSink for FileAuditLog {
    async fn append(&self, entry: &AuditEntry) -> Result<(), AuditError> {
        let text = render_entry(entry);
        let mut guard = self.file.lock().await;

        if guard.is_none() {
            *guard = Some(self.open().await?);
        }

        if let Some(file) = guard.as_mut() {
            let written = async {
                file.write_all(text.as_bytes()).await?;
                file.flush().await
            }
            .await;

            if let Err(err) = written {
                // Reopen on the next entry.
                *guard = None;
                return Err(err.into());
            }
        }

        Ok(())
    }
}

/// Keeps entries in memory.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: StdMutex<Vec<AuditEntry>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditLog {
    async fn append(&self, entry: &AuditEntry) -> Result<(), AuditError> {
        self.entries
            .lock()
            .map_err(|_| AuditError::Backend("memory audit log poisoned".to_string()))?
            .push(entry.clone());
        Ok(())
    }
}

/// Writes every entry to each inner sink, even when an earlier one fails.
#[derive(Default, Clone)]
pub struct AuditFanout {
    sinks: Vec<Arc<dyn AuditSink>>,
}

impl AuditFanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl AuditSink for AuditFanout {
    async fn append(&self, entry: &AuditEntry) -> Result<(), AuditError> {
        let mut failures = Vec::new();
        for sink in &self.sinks {
            if let Err(err) = sink.append(entry).await {
                failures.push(err.to_string());
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(AuditError::Backend(failures.join("; ")))
        }
    }
}
