//! Request lifecycle state for a single turn.

use std::fmt;
use std::time::Instant;

/// Identity of one accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TurnId(u64);

impl TurnId {
    #[must_use]
    pub fn new(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "turn-{}", self.0)
    }
}

/// `Idle -> Pending` on an accepted submission, `Pending -> Idle` when that
/// turn's reply or failure is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    #[default]
    Idle,
    Pending {
        turn_id: TurnId,
        started_at: Instant,
    },
}

impl TurnState {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, TurnState::Pending { .. })
    }

    #[must_use]
    pub fn pending_turn(&self) -> Option<TurnId> {
        match self {
            TurnState::Pending { turn_id, .. } => Some(*turn_id),
            TurnState::Idle => None,
        }
    }

    #[must_use]
    pub fn started_at(&self) -> Option<Instant> {
        match self {
            TurnState::Pending { started_at, .. } => Some(*started_at),
            TurnState::Idle => None,
        }
    }
}

/// Handed out when a submission is admitted; the caller performs the
/// outbound call with `content` and reports back under `turn_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnTicket {
    pub turn_id: TurnId,
    pub content: String,
}

/// What happened when a turn result was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnResolution {
    /// The reply was committed as the assistant entry.
    Answered,
    /// The call failed; the fallback entry was committed.
    Fallback,
    /// The result did not belong to the pending turn and was dropped.
    Stale,
}
