//! Operations submitted by the UI to the engine.

use super::turn::TurnId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Perform the outbound call for an admitted turn.
    SendMessage { turn_id: TurnId, content: String },
    /// Stop the engine task.
    Shutdown,
}
