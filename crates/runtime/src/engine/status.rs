//! Observable engine state.
use arena_core::{Observation, PlayerId};
use serde::{Deserialize, Serialize};

use super::outcome::SessionOutcome;
use super::pending::PendingTurn;

/// Position of the engine in the turn cycle.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EnginePhase {
    /// No validated registry yet.
    #[default]
    Unconfigured,
    /// Registry validated, `start` not called.
    Configured,
    AwaitingObservation,
    AwaitingAction,
    /// Waiting on an external submission for the pending turn.
    Suspended,
    ApplyingStep,
    /// Ended normally; the result is memoized.
    Terminal,
    /// Ended on a fault.
    Failed,
}

impl EnginePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Terminal | Self::Failed)
    }

    pub fn is_running(self) -> bool {
        matches!(
            self,
            Self::AwaitingObservation | Self::AwaitingAction | Self::Suspended | Self::ApplyingStep
        )
    }
}

/// Lock-free snapshot published on every phase change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStatus {
    pub phase: EnginePhase,
    /// Completed turns.
    pub turn: u32,
    pub pending: Option<PendingTurn>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartInfo {
    pub num_players: usize,
    pub initial_observation: Observation,
    pub seed: Option<u64>,
}

/// What a single `advance` call achieved.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// An interactive seat is up; submit its action to continue.
    Suspended(PendingTurn),
    /// An automated turn was applied and the session continues.
    Stepped { player: PlayerId, turn: u32 },
    Finished(SessionOutcome),
}

impl StepOutcome {
    /// True when another `advance` would not make progress on its own.
    pub fn is_blocked(&self) -> bool {
        !matches!(self, Self::Stepped { .. })
    }
}
