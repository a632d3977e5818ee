//! Conversation data model.
//!
//! Messages are immutable once appended. The display markup is computed
//! exactly once, at append time, and cached on the message; the reveal
//! scheduler and the renderer both work from that cached string.

use chrono::Local;

use crate::markup;

/// Unique per-session message identity. Issued monotonically and never
/// reused, so a stale reveal can never be confused with a newer message.
pub type MessageId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// Display info for a file attached to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentInfo {
    pub name: String,
    pub size: usize,
}

/// A single chat message.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender: Sender,
    /// Raw text as typed or as returned by the endpoint.
    pub content: String,
    /// Cached output of `markup::format_markup(content)`.
    pub formatted: String,
    pub files: Vec<AttachmentInfo>,
    pub timestamp: String,
}

/// Append-only ordered message log for the session.
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    next_id: MessageId,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, formatting its content once.
    pub fn push(&mut self, sender: Sender, content: String, files: Vec<AttachmentInfo>) -> MessageId {
        let id = self.next_id;
        self.next_id += 1;
        let formatted = markup::format_markup(&content);
        self.messages.push(ChatMessage {
            id,
            sender,
            content,
            formatted,
            files,
            timestamp: Local::now().format("%H:%M:%S").to_string(),
        });
        id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn latest(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// The latest message, if it is from the bot. Only this message is
    /// ever revealed progressively.
    pub fn latest_bot(&self) -> Option<&ChatMessage> {
        self.latest().filter(|msg| msg.sender == Sender::Bot)
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Drop all messages. Ids keep counting up so cleared ids are never
    /// reissued.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
