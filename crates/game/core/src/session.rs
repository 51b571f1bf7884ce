//! Contract between the turn engine and a game environment.
//!
//! Environments own the rules; the engine only drives the
//! `reset → (get_observation → step)* → close` sequence and never calls a
//! session from two turns at once.
use std::collections::BTreeMap;

use crate::error::EnvironmentError;
use crate::payload::{Action, Observation};
use crate::player::PlayerId;

/// Free-form key/value details reported by an environment.
pub type Info = BTreeMap<String, serde_json::Value>;

/// Final score per player.
pub type Rewards = BTreeMap<PlayerId, f64>;

/// Result of applying one action.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepReport {
    /// Whether the environment considers the game over.
    pub done: bool,
    pub info: Info,
}

impl StepReport {
    pub fn running() -> Self {
        Self::default()
    }

    pub fn finished() -> Self {
        Self {
            done: true,
            info: Info::new(),
        }
    }

    pub fn with_info(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.info.insert(key.into(), value.into());
        self
    }
}

/// Final accounting returned by [`GameSession::close`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FinalReport {
    pub rewards: Rewards,
    pub info: Info,
}

/// A single game environment instance.
///
/// Implementations are single-writer: the engine holds exclusive access for
/// the lifetime of the session and calls `close` at most once.
pub trait GameSession: Send {
    /// Starts a fresh game and returns the opening observation.
    fn reset(
        &mut self,
        num_players: usize,
        seed: Option<u64>,
    ) -> Result<Observation, EnvironmentError>;

    /// Returns the player whose turn it is and what that player sees.
    fn get_observation(&mut self) -> Result<(PlayerId, Observation), EnvironmentError>;

    /// Applies the current player's action.
    fn step(&mut self, action: &Action) -> Result<StepReport, EnvironmentError>;

    /// Ends the game and reports final rewards.
    fn close(&mut self) -> Result<FinalReport, EnvironmentError>;
}

impl<T: GameSession + ?Sized> GameSession for Box<T> {
    fn reset(
        &mut self,
        num_players: usize,
        seed: Option<u64>,
    ) -> Result<Observation, EnvironmentError> {
        (**self).reset(num_players, seed)
    }

    fn get_observation(&mut self) -> Result<(PlayerId, Observation), EnvironmentError> {
        (**self).get_observation()
    }

    fn step(&mut self, action: &Action) -> Result<StepReport, EnvironmentError> {
        (**self).step(action)
    }

    fn close(&mut self) -> Result<FinalReport, EnvironmentError> {
        (**self).close()
    }
}
