//! Continuation for a turn that waits on an interactive producer.
use arena_core::{Observation, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// "The engine is waiting for `player` to answer `observation`."
///
/// At most one exists per engine. It is created when a step-driven session
/// reaches an interactive seat and consumed by the matching submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTurn {
    pub player: PlayerId,
    pub observation: Observation,
    /// Number of turns completed before this one.
    pub turn: u32,
    pub issued_at: DateTime<Utc>,
}

impl PendingTurn {
    pub(crate) fn issue(player: PlayerId, observation: Observation, turn: u32) -> Self {
        Self {
            player,
            observation,
            turn,
            issued_at: Utc::now(),
        }
    }

    pub fn is_for(&self, player: PlayerId) -> bool {
        self.player == player
    }

    /// Time elapsed since the handle was issued.
    pub fn age(&self) -> chrono::Duration {
        Utc::now().signed_duration_since(self.issued_at)
    }
}
