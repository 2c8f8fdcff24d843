//! Wire and domain models for the 1secmail read API.

use serde::Deserialize;
use std::fmt;

/// Subject shown when the provider sent none.
pub(crate) const NO_SUBJECT: &str = "(No Subject)";
/// Body shown when the message carried neither a text nor an HTML part.
pub(crate) const NO_CONTENT: &str = "No content";

/// A disposable mailbox address.
///
/// Immutable once generated; regenerating a session replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    /// Local part, before the `@`.
    pub local_part: String,
    /// Provider domain, after the `@`.
    pub domain: String,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local_part, self.domain)
    }
}

/// One entry of the provider's inbox listing.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageSummary {
    /// Provider-assigned id, unique within the mailbox lifetime.
    pub id: u64,
    /// Sender address.
    pub from: String,
    /// Subject line.
    #[serde(default)]
    pub subject: String,
    /// Receive time, `YYYY-MM-DD HH:MM:SS`.
    pub date: String,
}

/// Full message payload from the provider's read endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageDetails {
    /// Provider-assigned id, matching the listing entry.
    pub id: u64,
    /// Sender address.
    pub from: String,
    /// Subject line; the provider may omit it entirely.
    #[serde(default)]
    pub subject: Option<String>,
    /// Receive time, `YYYY-MM-DD HH:MM:SS`.
    pub date: String,
    /// Plain-text part, when present.
    #[serde(default, rename = "textBody")]
    pub text_body: Option<String>,
    /// HTML part, when present.
    #[serde(default, rename = "htmlBody")]
    pub html_body: Option<String>,
}

/// A received message held in the inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Provider-assigned id.
    pub id: u64,
    /// Sender address.
    pub from: String,
    /// Subject line, never empty.
    pub subject: String,
    /// Receive time as the provider sent it; the renderer parses it.
    pub received_at: String,
    /// Message body: the text part, falling back to the HTML part.
    pub body: String,
    /// Flipped once the message has been opened.
    pub is_read: bool,
}

impl From<MessageDetails> for Message {
    fn from(details: MessageDetails) -> Self {
        let subject = match details.subject {
            Some(subject) if !subject.trim().is_empty() => subject,
            _ => NO_SUBJECT.to_string(),
        };
        let body = pick_body(details.text_body, details.html_body);
        Self {
            id: details.id,
            from: details.from,
            subject,
            received_at: details.date,
            body,
            is_read: false,
        }
    }
}

fn pick_body(text: Option<String>, html: Option<String>) -> String {
    for candidate in [text, html].into_iter().flatten() {
        if !candidate.trim().is_empty() {
            return candidate;
        }
    }
    NO_CONTENT.to_string()
}
