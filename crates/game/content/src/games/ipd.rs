use std::fmt::Write as _;

use arena_core::{
    Action, EnvOperation, EnvironmentError, FinalReport, GameSession, Observation, PlayerId,
    Rewards, StepReport,
};

use super::{already_over, bracketed, not_started};

const DEFAULT_ROUNDS: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
enum Choice {
    Cooperate,
    Defect,
}

impl Choice {
    fn parse(action: &Action) -> Option<Self> {
        let word = bracketed(action.as_str()).to_ascii_lowercase();
        if word.starts_with('c') {
            Some(Self::Cooperate)
        } else if word.starts_with('d') {
            Some(Self::Defect)
        } else {
            None
        }
    }

    /// Points earned by `self` against `other`.
    fn payoff(self, other: Self) -> u32 {
        match (self, other) {
            (Self::Cooperate, Self::Cooperate) => 3,
            (Self::Cooperate, Self::Defect) => 0,
            (Self::Defect, Self::Cooperate) => 5,
            (Self::Defect, Self::Defect) => 1,
        }
    }
}

/// Iterated prisoner's dilemma where every player meets every other player
/// each round. Players decide in seat order; payoffs settle once the whole
/// table has chosen.
#[derive(Debug)]
pub struct ThreePlayerIpd {
    rounds: u32,
    players: usize,
    round: u32,
    seat: usize,
    choices: Vec<Choice>,
    scores: Vec<u32>,
    last_round: Vec<Choice>,
    done: bool,
}

impl Default for ThreePlayerIpd {
    fn default() -> Self {
        Self::with_rounds(DEFAULT_ROUNDS)
    }
}

impl ThreePlayerIpd {
    pub fn with_rounds(rounds: u32) -> Self {
        Self {
            rounds: rounds.max(1),
            players: 0,
            round: 0,
            seat: 0,
            choices: Vec::new(),
            scores: Vec::new(),
            last_round: Vec::new(),
            done: false,
        }
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    fn settle_round(&mut self) {
        for (i, mine) in self.choices.iter().enumerate() {
            for (j, theirs) in self.choices.iter().enumerate() {
                if i != j {
                    self.scores[i] += mine.payoff(*theirs);
                }
            }
        }
        self.last_round = std::mem::take(&mut self.choices);
        self.round += 1;
        self.seat = 0;
        self.done = self.round >= self.rounds;
    }
}

impl GameSession for ThreePlayerIpd {
    fn reset(
        &mut self,
        num_players: usize,
        _seed: Option<u64>,
    ) -> Result<Observation, EnvironmentError> {
        if num_players < 2 {
            return Err(EnvironmentError::failed(
                EnvOperation::Reset,
                format!("prisoner's dilemma needs at least 2 players, got {num_players}"),
            ));
        }
        *self = Self::with_rounds(self.rounds);
        self.players = num_players;
        self.scores = vec![0; num_players];

        Ok(Observation::new(format!(
            "Iterated prisoner's dilemma: {num_players} players, {} rounds. Each round you \
             play every other player once. Answer [cooperate] or [defect].",
            self.rounds
        )))
    }

    fn get_observation(&mut self) -> Result<(PlayerId, Observation), EnvironmentError> {
        if self.players == 0 {
            return Err(not_started(EnvOperation::GetObservation));
        }
        if self.done {
            return Err(already_over(EnvOperation::GetObservation));
        }

        let mut text = format!(
            "Round {}/{}. You are Player {}.",
            self.round + 1,
            self.rounds,
            self.seat
        );
        if !self.last_round.is_empty() {
            text.push_str(" Last round:");
            for (player, choice) in self.last_round.iter().enumerate() {
                let _ = write!(text, " P{player} {choice};");
            }
        }
        let _ = write!(text, " Scores: {:?}. [cooperate] or [defect]?", self.scores);

        Ok((PlayerId(self.seat as u32), Observation::new(text)))
    }

    fn step(&mut self, action: &Action) -> Result<StepReport, EnvironmentError> {
        if self.players == 0 {
            return Err(not_started(EnvOperation::Step));
        }
        if self.done {
            return Err(already_over(EnvOperation::Step));
        }

        let parsed = Choice::parse(action);
        let choice = parsed.unwrap_or(Choice::Cooperate);
        self.choices.push(choice);
        self.seat += 1;

        let mut report = StepReport::running()
            .with_info("player", self.seat - 1)
            .with_info("choice", choice.to_string());
        if parsed.is_none() {
            report = report.with_info("invalid_move", true);
        }
        if self.seat == self.players {
            self.settle_round();
            report = report.with_info("round_settled", self.round);
        }

        report.done = self.done;
        Ok(report)
    }

    fn close(&mut self) -> Result<FinalReport, EnvironmentError> {
        let rewards: Rewards = self
            .scores
            .iter()
            .enumerate()
            .map(|(player, score)| (PlayerId(player as u32), f64::from(*score)))
            .collect();

        let mut report = FinalReport {
            rewards,
            ..FinalReport::default()
        };
        report
            .info
            .insert("rounds_played".into(), self.round.into());
        report
            .info
            .insert("scores".into(), serde_json::json!(self.scores));
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(game: &mut ThreePlayerIpd, moves: &[&str]) -> StepReport {
        let mut last = StepReport::default();
        for text in moves {
            game.get_observation().unwrap();
            last = game.step(&Action::new(*text)).unwrap();
        }
        last
    }

    #[test]
    fn seats_rotate_within_a_round() {
        let mut game = ThreePlayerIpd::with_rounds(2);
        game.reset(3, None).unwrap();

        for seat in 0..3 {
            let (player, _) = game.get_observation().unwrap();
            assert_eq!(player, PlayerId(seat));
            game.step(&Action::new("[cooperate]")).unwrap();
        }
        let (player, observation) = game.get_observation().unwrap();
        assert_eq!(player, PlayerId(0));
        assert!(observation.as_str().contains("Round 2/2"));
    }

    #[test]
    fn defectors_profit_from_cooperators() {
        let mut game = ThreePlayerIpd::with_rounds(1);
        game.reset(3, None).unwrap();

        let report = play(&mut game, &["[defect]", "[cooperate]", "I [cooperate]"]);
        assert!(report.done);
        assert_eq!(game.scores(), &[10, 3, 3]);

        let final_report = game.close().unwrap();
        assert_eq!(final_report.rewards[&PlayerId(0)], 10.0);
    }

    #[test]
    fn gibberish_counts_as_cooperation() {
        let mut game = ThreePlayerIpd::with_rounds(1);
        game.reset(3, None).unwrap();

        let report = game.step(&Action::new("maybe?")).unwrap();
        assert_eq!(report.info["invalid_move"], true);
        assert_eq!(report.info["choice"], "cooperate");
    }

    #[test]
    fn refuses_turns_after_the_end() {
        let mut game = ThreePlayerIpd::with_rounds(1);
        assert!(game.get_observation().is_err());

        game.reset(2, None).unwrap();
        play(&mut game, &["[c]", "[d]"]);
        let err = game.step(&Action::new("[c]")).unwrap_err();
        assert_eq!(err.operation(), EnvOperation::Step);
    }
}
