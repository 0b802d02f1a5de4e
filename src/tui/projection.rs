//! Pure projection of a [`Session`] into what the transcript shows.
//!
//! Nothing here mutates state; calling [`project`] twice on the same
//! session yields the same view.

use crate::core::session::Session;
use crate::core::store::{Message, MessageId};

/// Something in the transcript the user can activate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Reasoning-trace toggle of an assistant message.
    Disclosure(MessageId),
    /// The `index`-th related tag of an assistant message.
    Tag { message: MessageId, index: usize },
}

/// Reasoning-trace affordance of one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThoughtView<'a> {
    pub text: &'a str,
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptRow<'a> {
    Message {
        id: MessageId,
        message: &'a Message,
        /// Present only for assistant messages carrying a trace.
        thought: Option<ThoughtView<'a>>,
        /// Empty unless this is an assistant message with tags.
        tags: &'a [String],
    },
    /// Shown after the last message while a turn is pending.
    Typing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptView<'a> {
    pub rows: Vec<TranscriptRow<'a>>,
    pub submit_enabled: bool,
}

impl TranscriptView<'_> {
    /// Activatable targets in display order.
    #[must_use]
    pub fn targets(&self) -> Vec<Target> {
        let mut targets = Vec::new();
        for row in &self.rows {
            if let TranscriptRow::Message {
                id, thought, tags, ..
            } = row
            {
                if thought.is_some() {
                    targets.push(Target::Disclosure(*id));
                }
                targets.extend((0..tags.len()).map(|index| Target::Tag {
                    message: *id,
                    index,
                }));
            }
        }
        targets
    }
}

#[must_use]
pub fn project(session: &Session) -> TranscriptView<'_> {
    let mut rows: Vec<TranscriptRow<'_>> = session
        .store()
        .iter()
        .map(|(id, message)| {
            let thought = if message.is_assistant() {
                message.thought().map(|text| ThoughtView {
                    text,
                    open: session.is_disclosure_open(id),
                })
            } else {
                None
            };
            let tags: &[String] = if message.is_assistant() {
                message.related_tags()
            } else {
                &[]
            };
            TranscriptRow::Message {
                id,
                message,
                thought,
                tags,
            }
        })
        .collect();

    if session.is_pending() {
        rows.push(TranscriptRow::Typing);
    }

    TranscriptView {
        rows,
        submit_enabled: session.can_submit(),
    }
}
