//! Alert message text.

use sms_gateway::client::MAX_BODY_CHARS;

/// Default prefix for map links.
pub const DEFAULT_MAP_BASE_URL: &str = "https://maps.google.com/?q=";

/// Longest encoded location carried in an SMS link.
pub const MAX_SMS_LOCATION_CHARS: usize = 480;

/// Renders SMS and email bodies for an emergency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertTemplate {
    map_base_url: String,
}

impl Default for AlertTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_MAP_BASE_URL)
    }
}

impl AlertTemplate {
    pub fn new(map_base_url: impl Into<String>) -> Self {
        Self {
            map_base_url: map_base_url.into(),
        }
    }

    /// Link to the reported location.
    pub fn map_link(&self, location: &str) -> String {
        format!("{}{}", self.map_base_url, urlencoding::encode(location.trim()))
    }

    /// SMS text. The encoded location is cut at a whole character so the
    /// message stays within the provider's length limit.
    pub fn sms_body(&self, username: &str, location: &str) -> String {
        let mut encoded = String::new();
        let mut buf = [0u8; 4];
        for ch in location.trim().chars() {
            let piece = urlencoding::encode(ch.encode_utf8(&mut buf));
            if encoded.len() + piece.len() > MAX_SMS_LOCATION_CHARS {
                break;
            }
            encoded.push_str(&piece);
        }

        format!(
            "SOS! {} is in danger! Location: {}{}",
            username, self.map_base_url, encoded
        )
        .chars()
        .take(MAX_BODY_CHARS)
        .collect()
    }

    pub fn email_subject(&self, username: &str) -> String {
        format!("SOS Alert: {} needs help", username)
    }

    pub fn email_body(&self, username: &str, location: &str, trigger: &str) -> String {
        format!(
            "{username} has triggered an emergency alert ({trigger}) and listed you as an emergency contact.\n\
             \n\
             Last known location: {link}\n\
             \n\
             Please try to reach them immediately. If you cannot, contact local emergency services.\n",
            username = username,
            trigger = trigger,
            link = self.map_link(location),
        )
    }
}
