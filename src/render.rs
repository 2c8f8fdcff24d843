//! View models rendered from inbox snapshots.
//!
//! Everything here is a pure function of the data it is given; no rendering
//! framework leaks in. Hosts take these view models and draw them however
//! they like.

use crate::session::Status;
use crate::Message;
use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::LazyLock;

const PROVIDER_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static ACTIVE_BLOCKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:script|style)\b[^>]*>.*?</(?:script|style)\s*>")
        .expect("static pattern")
});
static TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("static pattern"));

/// List-side view of the inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboxView {
    /// Placeholder for a mailbox with nothing in it yet.
    Empty,
    /// One row per message, newest first.
    List(Vec<InboxRow>),
}

/// One line of the message list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxRow {
    /// Message id, for selection.
    pub id: u64,
    /// Sender address.
    pub from: String,
    /// Subject line.
    pub subject: String,
    /// Time of day the message arrived (`HH:MM`), or the raw provider
    /// timestamp when it does not parse.
    pub time: String,
    /// Whether the row should be visually distinguished as unread.
    pub unread: bool,
}

/// Reader view of a single message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    /// Sender address.
    pub from: String,
    /// Subject line.
    pub subject: String,
    /// Full receive timestamp.
    pub received_at: String,
    /// Body with all active content stripped.
    pub body: String,
}

/// Render the message list, newest first.
pub fn inbox_view(messages: &[Message]) -> InboxView {
    if messages.is_empty() {
        return InboxView::Empty;
    }
    let rows = messages
        .iter()
        .map(|m| InboxRow {
            id: m.id,
            from: m.from.clone(),
            subject: m.subject.clone(),
            time: time_of_day(&m.received_at),
            unread: !m.is_read,
        })
        .collect();
    InboxView::List(rows)
}

/// Render a single message for the reader screen.
pub fn message_view(message: &Message) -> MessageView {
    MessageView {
        from: message.from.clone(),
        subject: message.subject.clone(),
        received_at: message.received_at.clone(),
        body: sanitize_body(&message.body),
    }
}

/// Status strip text for the current session state.
pub fn status_line(status: &Status) -> String {
    match status {
        Status::Listening => "Listening for incoming emails...".to_string(),
        Status::NewMail(1) => "1 new email received!".to_string(),
        Status::NewMail(n) => format!("{n} new emails received!"),
        Status::Expired => "Email expired. Generate a new one.".to_string(),
    }
}

/// Strip active content from an untrusted message body.
///
/// Remote HTML must never reach the host with executable parts intact:
/// script and style elements disappear with their contents, every remaining
/// tag is dropped, and what is left is inert text.
pub fn sanitize_body(raw: &str) -> String {
    let without_blocks = ACTIVE_BLOCKS.replace_all(raw, "");
    let text = TAGS.replace_all(&without_blocks, " ");
    text.trim().to_string()
}

fn time_of_day(received_at: &str) -> String {
    NaiveDateTime::parse_from_str(received_at, PROVIDER_DATE_FORMAT)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|_| received_at.to_string())
}
