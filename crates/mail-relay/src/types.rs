/// A plain-text email to a single recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    /// Recipient address
    pub to: String,
    /// Email subject
    pub subject: String,
    /// Plain text body
    pub body: String,
}

impl Email {
    /// Create a new email.
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// What the relay said when it accepted a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailReceipt {
    /// SMTP reply code, e.g. `250`.
    pub code: String,
    /// First line of the reply text, often containing a queue ID.
    pub message: String,
}

impl std::fmt::Display for MailReceipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{} {}", self.code, self.message)
        }
    }
}
