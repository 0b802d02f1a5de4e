//! Append-only conversation log.

use crate::models::AssistantReply;

/// Position of a message in the store. Stable because entries are never
/// removed or reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(usize);

impl MessageId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// A committed conversation entry.
///
/// `thought` and `related_tags` can only be set through
/// [`Message::assistant`], so user entries never carry them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    role: Role,
    content: String,
    thought: Option<String>,
    related_tags: Vec<String>,
}

impl Message {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            thought: None,
            related_tags: Vec::new(),
        }
    }

    #[must_use]
    pub fn assistant(reply: AssistantReply) -> Self {
        Self {
            role: Role::Assistant,
            content: reply.answer,
            thought: reply.thought,
            related_tags: reply.related_tags,
        }
    }

    /// Assistant entry with text only (greeting, fallback).
    #[must_use]
    pub fn assistant_text(content: impl Into<String>) -> Self {
        Self::assistant(AssistantReply::answer_only(content))
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn thought(&self) -> Option<&str> {
        self.thought.as_deref()
    }

    #[must_use]
    pub fn related_tags(&self) -> &[String] {
        &self.related_tags
    }

    #[must_use]
    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}

#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    entries: Vec<Message>,
}

impl MessageStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the end. The only mutation the store allows.
    pub fn append(&mut self, message: Message) -> MessageId {
        let id = MessageId(self.entries.len());
        self.entries.push(message);
        id
    }

    #[must_use]
    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.entries.get(id.0)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (MessageId, &Message)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, message)| (MessageId(idx), message))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn last_assistant(&self) -> Option<(MessageId, &Message)> {
        self.iter().rev().find(|(_, message)| message.is_assistant())
    }
}
