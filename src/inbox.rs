//! In-memory inbox: ordered newest-first, unique by message id.

use crate::Message;

/// Ordered collection of received messages for one address.
///
/// New messages go to the front. Ids are unique for the lifetime of the
/// mailbox: inserting an id that is already present is a no-op, and the
/// earliest-inserted fields win. The poll task and the command handlers
/// share one inbox behind a mutex, so every mutation here is a short
/// synchronous critical section.
#[derive(Debug, Default)]
pub struct Inbox {
    messages: Vec<Message>,
}

impl Inbox {
    /// An empty inbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the front unless a message with the same id is already
    /// present. Returns whether the message was inserted.
    pub fn insert_if_absent(&mut self, message: Message) -> bool {
        if self.contains(message.id) {
            return false;
        }
        self.messages.insert(0, message);
        true
    }

    /// Flip a message to read. Idempotent; returns false when the id is
    /// absent.
    pub fn mark_read(&mut self, id: u64) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.is_read = true;
                true
            }
            None => false,
        }
    }

    /// Drop every message. Used on regeneration and on delete-all.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Whether a message with this id is already present.
    pub fn contains(&self, id: u64) -> bool {
        self.messages.iter().any(|m| m.id == id)
    }

    /// Look up one message by id.
    pub fn get(&self, id: u64) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Count of messages not yet opened.
    pub fn unread_count(&self) -> usize {
        self.messages.iter().filter(|m| !m.is_read).count()
    }

    /// Number of messages held.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the inbox holds nothing.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The current messages, newest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: u64, subject: &str) -> Message {
        Message {
            id,
            from: "sender@example.com".to_string(),
            subject: subject.to_string(),
            received_at: "2024-03-01 10:15:00".to_string(),
            body: "body".to_string(),
            is_read: false,
        }
    }

    #[test]
    fn duplicate_ids_keep_the_earliest_fields() {
        let mut inbox = Inbox::new();
        assert!(inbox.insert_if_absent(message(5, "original")));
        assert!(!inbox.insert_if_absent(message(5, "replacement")));

        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox.get(5).unwrap().subject, "original");
    }

    #[test]
    fn newer_messages_sit_at_the_front() {
        let mut inbox = Inbox::new();
        inbox.insert_if_absent(message(1, "first"));
        inbox.insert_if_absent(message(2, "second"));

        let ids: Vec<u64> = inbox.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn unread_count_tracks_mark_read_history() {
        let mut inbox = Inbox::new();
        inbox.insert_if_absent(message(1, "a"));
        inbox.insert_if_absent(message(2, "b"));
        inbox.insert_if_absent(message(3, "c"));
        assert_eq!(inbox.unread_count(), 3);

        assert!(inbox.mark_read(2));
        assert_eq!(inbox.unread_count(), 2);

        inbox.mark_read(1);
        inbox.mark_read(3);
        assert_eq!(inbox.unread_count(), 0);
    }

    #[test]
    fn mark_read_is_idempotent() {
        let mut inbox = Inbox::new();
        inbox.insert_if_absent(message(1, "a"));

        assert!(inbox.mark_read(1));
        let after_once: Vec<Message> = inbox.messages().to_vec();
        assert!(inbox.mark_read(1));
        assert_eq!(inbox.messages(), &after_once[..]);
    }

    #[test]
    fn mark_read_on_absent_id_is_a_no_op() {
        let mut inbox = Inbox::new();
        inbox.insert_if_absent(message(1, "a"));

        assert!(!inbox.mark_read(99));
        assert_eq!(inbox.unread_count(), 1);
    }

    #[test]
    fn clear_empties_the_collection() {
        let mut inbox = Inbox::new();
        inbox.insert_if_absent(message(1, "a"));
        inbox.insert_if_absent(message(2, "b"));

        inbox.clear();
        assert!(inbox.is_empty());
        assert_eq!(inbox.unread_count(), 0);
    }
}
