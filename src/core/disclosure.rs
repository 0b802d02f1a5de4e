//! Per-message reasoning-trace visibility, kept beside the store.

use std::collections::HashSet;

use super::store::MessageId;

#[derive(Debug, Clone, Default)]
pub struct DisclosureState {
    open: HashSet<MessageId>,
}

impl DisclosureState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one message's flag. Returns the new state.
    pub fn toggle(&mut self, id: MessageId) -> bool {
        if self.open.remove(&id) {
            false
        } else {
            self.open.insert(id);
            true
        }
    }

    #[must_use]
    pub fn is_open(&self, id: MessageId) -> bool {
        self.open.contains(&id)
    }
}
