//! Trigger types and the notification gate.

use std::fmt;

use serde::{Serialize, Serializer};

/// Why an emergency event was created.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TriggerType {
    /// SOS button press.
    Manual,
    /// Scream or distress sound detected.
    Voice,
    /// Safe-word detected by speech recognition.
    Keyword,
    /// Routine location ping while safety mode is on.
    PeriodicUpdate,
    /// Any tag this service does not know.
    Other(String),
}

impl TriggerType {
    /// Parse a client-supplied tag. Blank tags are treated as a manual trigger.
    pub fn parse(tag: &str) -> Self {
        let tag = tag.trim();
        match tag.to_ascii_lowercase().as_str() {
            "" | "manual" => TriggerType::Manual,
            "voice" => TriggerType::Voice,
            "keyword" => TriggerType::Keyword,
            "periodic_update" => TriggerType::PeriodicUpdate,
            _ => TriggerType::Other(tag.to_string()),
        }
    }

    /// Tag as stored and logged.
    pub fn as_str(&self) -> &str {
        match self {
            TriggerType::Manual => "manual",
            TriggerType::Voice => "voice",
            TriggerType::Keyword => "keyword",
            TriggerType::PeriodicUpdate => "periodic_update",
            TriggerType::Other(tag) => tag,
        }
    }

    /// Whether contacts should be notified.
    ///
    /// Only routine location pings are suppressed. Unknown tags notify like
    /// a manual trigger so that an SOS is never dropped over a typo.
    pub fn requires_notification(&self) -> bool {
        !matches!(self, TriggerType::PeriodicUpdate)
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TriggerType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tags() {
        assert_eq!(TriggerType::parse("manual"), TriggerType::Manual);
        assert_eq!(TriggerType::parse("Voice"), TriggerType::Voice);
        assert_eq!(TriggerType::parse(" keyword "), TriggerType::Keyword);
        assert_eq!(TriggerType::parse("periodic_update"), TriggerType::PeriodicUpdate);
        assert_eq!(TriggerType::parse(""), TriggerType::Manual);
    }

    #[test]
    fn test_unknown_tag_is_preserved_and_notifies() {
        let trigger = TriggerType::parse("shake");
        assert_eq!(trigger, TriggerType::Other("shake".to_string()));
        assert_eq!(trigger.as_str(), "shake");
        assert!(trigger.requires_notification());
    }

    #[test]
    fn test_only_periodic_update_is_suppressed() {
        assert!(!TriggerType::PeriodicUpdate.requires_notification());
        for trigger in [TriggerType::Manual, TriggerType::Voice, TriggerType::Keyword] {
            assert!(trigger.requires_notification());
        }
    }
}
