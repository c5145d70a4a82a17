//! Single-slot store for the most recent incoming message.

use heapless::String;
use log::warn;

use crate::network::MessageSink;

/// Maximum stored topic length in bytes.
pub const MAX_TOPIC_LEN: usize = 128;
/// Maximum stored payload length in bytes.
pub const MAX_PAYLOAD_LEN: usize = 256;

/// The last message delivered to a session.
///
/// Holds at most one message. A new delivery overwrites an unread one; there
/// is no queue. Deliveries that do not fit, or whose payload is not UTF-8, are
/// dropped and leave the slot untouched.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LastMessage {
    topic: String<MAX_TOPIC_LEN>,
    payload: String<MAX_PAYLOAD_LEN>,
    dropped: u32,
}

impl LastMessage {
    /// An empty slot.
    pub const fn new() -> Self {
        Self {
            topic: String::new(),
            payload: String::new(),
            dropped: 0,
        }
    }

    /// Topic of the last message, empty if none.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Payload of the last message, empty if none.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Whether a message is stored.
    pub fn is_empty(&self) -> bool {
        self.topic.is_empty() && self.payload.is_empty()
    }

    /// Clear both fields.
    pub fn clear(&mut self) {
        self.topic.clear();
        self.payload.clear();
    }

    /// Number of deliveries discarded because they did not fit.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    fn store(&mut self, topic: &str, payload: &[u8]) -> bool {
        let Ok(text) = core::str::from_utf8(payload) else {
            return false;
        };
        if topic.len() > MAX_TOPIC_LEN || text.len() > MAX_PAYLOAD_LEN {
            return false;
        }
        self.topic.clear();
        self.payload.clear();
        // Both lengths were checked above.
        let _ = self.topic.push_str(topic);
        let _ = self.payload.push_str(text);
        true
    }
}

impl MessageSink for LastMessage {
    fn deliver(&mut self, topic: &str, payload: &[u8]) {
        if !self.store(topic, payload) {
            self.dropped = self.dropped.saturating_add(1);
            warn!(
                "Dropped message on [{}] ({} bytes): does not fit the message slot",
                topic,
                payload.len()
            );
        }
    }
}
