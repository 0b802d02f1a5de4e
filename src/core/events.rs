//! Events emitted by the core engine to the UI.

use crate::client::ClientError;
use crate::models::AssistantReply;

use super::turn::TurnId;

#[derive(Debug, Clone)]
pub enum Event {
    /// The outbound call for `turn_id` resolved.
    TurnComplete {
        turn_id: TurnId,
        result: Result<AssistantReply, ClientError>,
    },
}
