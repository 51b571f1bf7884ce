//! Terminal results of a session.
use arena_core::{Info, PlayerId, Rewards};
use serde::{Deserialize, Serialize};

/// Why a session ended normally.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameStatus {
    /// The environment reported `done`.
    Completed,
    /// The step budget ran out first.
    MaxStepsReached,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub status: GameStatus,
    pub steps: u32,
    pub rewards: Rewards,
    pub info: Info,
    pub human_players: Vec<PlayerId>,
    pub automated_players: Vec<PlayerId>,
}

impl GameResult {
    /// Players sharing the highest reward.
    pub fn winners(&self) -> Vec<PlayerId> {
        let best = self
            .rewards
            .values()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        self.rewards
            .iter()
            .filter(|(_, reward)| **reward == best)
            .map(|(player, _)| *player)
            .collect()
    }

    pub fn is_human(&self, player: PlayerId) -> bool {
        self.human_players.contains(&player)
    }
}

/// A session that ended on a fault instead of a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionFailure {
    pub reason: String,
    pub error_code: String,
    pub steps: u32,
    /// Present when the cleanup `close()` still succeeded.
    pub rewards: Option<Rewards>,
    pub info: Info,
    pub human_players: Vec<PlayerId>,
    pub automated_players: Vec<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SessionOutcome {
    Finished(GameResult),
    Failed(SessionFailure),
}

impl SessionOutcome {
    pub fn result(&self) -> Option<&GameResult> {
        match self {
            Self::Finished(result) => Some(result),
            Self::Failed(_) => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn steps(&self) -> u32 {
        match self {
            Self::Finished(result) => result.steps,
            Self::Failed(failure) => failure.steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(rewards: &[(u32, f64)]) -> GameResult {
        GameResult {
            status: GameStatus::Completed,
            steps: 3,
            rewards: rewards.iter().map(|(p, r)| (PlayerId(*p), *r)).collect(),
            info: Info::new(),
            human_players: vec![PlayerId(1)],
            automated_players: vec![PlayerId(0), PlayerId(2)],
        }
    }

    #[test]
    fn winners_include_ties() {
        let result = result(&[(0, 1.0), (1, 1.0), (2, -1.0)]);
        assert_eq!(result.winners(), vec![PlayerId(0), PlayerId(1)]);
        assert!(result.is_human(PlayerId(1)));
        assert!(!result.is_human(PlayerId(2)));
    }

    #[test]
    fn no_rewards_means_no_winners() {
        assert!(result(&[]).winners().is_empty());
    }

    #[test]
    fn status_serializes_in_snake_case() {
        assert_eq!(GameStatus::MaxStepsReached.to_string(), "max_steps_reached");
        let json = serde_json::to_value(result(&[(0, 1.0)])).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["rewards"]["0"], 1.0);
    }
}
