use arena_core::{
    Action, EnvOperation, EnvironmentError, FinalReport, GameSession, Observation, PlayerId,
    StepReport,
};
use rand::Rng;

use super::{already_over, bracketed, not_started, seeded_rng};

const MAX_TAKE: u32 = 3;

/// Players take turns removing 1 to 3 from a shared counter; whoever takes
/// the last one wins.
#[derive(Debug, Default)]
pub struct Countdown {
    players: usize,
    remaining: u32,
    seat: usize,
    winner: Option<usize>,
}

impl Countdown {
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl GameSession for Countdown {
    fn reset(
        &mut self,
        num_players: usize,
        seed: Option<u64>,
    ) -> Result<Observation, EnvironmentError> {
        if num_players == 0 {
            return Err(EnvironmentError::failed(
                EnvOperation::Reset,
                "countdown needs at least one player",
            ));
        }
        let mut rng = seeded_rng(seed);

        *self = Self {
            players: num_players,
            remaining: rng.gen_range(12..=24),
            seat: 0,
            winner: None,
        };
        tracing::debug!(start = self.remaining, "countdown reset");

        Ok(Observation::new(format!(
            "Countdown from {}. Take [1], [2] or [3]; taking the last one wins.",
            self.remaining
        )))
    }

    fn get_observation(&mut self) -> Result<(PlayerId, Observation), EnvironmentError> {
        if self.players == 0 {
            return Err(not_started(EnvOperation::GetObservation));
        }
        if self.winner.is_some() {
            return Err(already_over(EnvOperation::GetObservation));
        }
        let text = format!(
            "Player {}, the counter is at {}. How many do you take?",
            self.seat, self.remaining
        );
        Ok((PlayerId(self.seat as u32), Observation::new(text)))
    }

    fn step(&mut self, action: &Action) -> Result<StepReport, EnvironmentError> {
        if self.players == 0 {
            return Err(not_started(EnvOperation::Step));
        }
        if self.winner.is_some() {
            return Err(already_over(EnvOperation::Step));
        }

        let requested = bracketed(action.as_str())
            .parse::<u32>()
            .ok()
            .filter(|n| (1..=MAX_TAKE).contains(n));
        let taken = requested.unwrap_or(1).min(self.remaining);
        self.remaining -= taken;

        let mut report = StepReport::running()
            .with_info("taken", taken)
            .with_info("remaining", self.remaining);
        if requested.is_none() {
            report = report.with_info("invalid_move", true);
        }

        if self.remaining == 0 {
            self.winner = Some(self.seat);
            report.done = true;
        } else {
            self.seat = (self.seat + 1) % self.players;
        }
        Ok(report)
    }

    fn close(&mut self) -> Result<FinalReport, EnvironmentError> {
        let mut report = FinalReport::default();
        for seat in 0..self.players {
            let reward = if Some(seat) == self.winner { 1.0 } else { 0.0 };
            report.rewards.insert(PlayerId(seat as u32), reward);
        }
        report
            .info
            .insert("remaining".into(), self.remaining.into());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_fixes_the_starting_count() {
        let mut a = Countdown::default();
        let mut b = Countdown::default();
        a.reset(2, Some(9)).unwrap();
        b.reset(2, Some(9)).unwrap();
        assert_eq!(a.remaining(), b.remaining());
        assert!((12..=24).contains(&a.remaining()));
    }

    #[test]
    fn last_taker_wins() {
        let mut game = Countdown::default();
        game.reset(2, Some(3)).unwrap();

        let mut last = StepReport::default();
        let mut mover = PlayerId(0);
        while !last.done {
            let (player, _) = game.get_observation().unwrap();
            mover = player;
            last = game.step(&Action::new("[3]")).unwrap();
        }

        let report = game.close().unwrap();
        assert_eq!(report.rewards[&mover], 1.0);
        assert_eq!(report.rewards.values().sum::<f64>(), 1.0);
    }

    #[test]
    fn out_of_range_takes_one() {
        let mut game = Countdown::default();
        game.reset(2, Some(1)).unwrap();
        let before = game.remaining();

        let report = game.step(&Action::new("[7]")).unwrap();
        assert_eq!(game.remaining(), before - 1);
        assert_eq!(report.info["invalid_move"], true);
    }
}
