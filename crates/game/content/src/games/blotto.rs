use arena_core::{
    Action, EnvOperation, EnvironmentError, FinalReport, GameSession, Observation, PlayerId,
    StepReport,
};

use super::{already_over, bracketed, not_started};

const FIELDS: [char; 3] = ['A', 'B', 'C'];
const TROOPS: u32 = 20;
const DEFAULT_ROUNDS: u32 = 3;

type Allocation = [u32; 3];

/// Parses `A7 B7 C6`; every field must appear once and the total must be
/// exactly [`TROOPS`].
fn parse_allocation(text: &str) -> Option<Allocation> {
    let mut allocation = [None; 3];
    for token in text.split([' ', ',']).filter(|t| !t.is_empty()) {
        let mut chars = token.chars();
        let field = chars.next()?.to_ascii_uppercase();
        let index = FIELDS.iter().position(|f| *f == field)?;
        let troops = chars.as_str().parse::<u32>().ok()?;
        if allocation[index].replace(troops).is_some() {
            return None;
        }
    }

    let [Some(a), Some(b), Some(c)] = allocation else {
        return None;
    };
    (a + b + c == TROOPS).then_some([a, b, c])
}

/// Two commanders split troops across three fields; each round, whoever
/// wins more fields takes the round.
#[derive(Debug)]
pub struct ColonelBlotto {
    rounds: u32,
    started: bool,
    round: u32,
    pending: Option<Allocation>,
    wins: [u32; 2],
    done: bool,
}

impl Default for ColonelBlotto {
    fn default() -> Self {
        Self::with_rounds(DEFAULT_ROUNDS)
    }
}

impl ColonelBlotto {
    pub fn with_rounds(rounds: u32) -> Self {
        Self {
            rounds: rounds.max(1),
            started: false,
            round: 0,
            pending: None,
            wins: [0; 2],
            done: false,
        }
    }

    pub fn wins(&self) -> [u32; 2] {
        self.wins
    }

    fn seat(&self) -> usize {
        usize::from(self.pending.is_some())
    }

    /// Returns the round winner, `None` on a tie.
    fn settle(&mut self, first: Allocation, second: Allocation) -> Option<usize> {
        let (mut fields_first, mut fields_second) = (0, 0);
        for (a, b) in first.iter().zip(second.iter()) {
            match a.cmp(b) {
                std::cmp::Ordering::Greater => fields_first += 1,
                std::cmp::Ordering::Less => fields_second += 1,
                std::cmp::Ordering::Equal => {}
            }
        }

        let winner = match fields_first.cmp(&fields_second) {
            std::cmp::Ordering::Greater => Some(0),
            std::cmp::Ordering::Less => Some(1),
            std::cmp::Ordering::Equal => None,
        };
        if let Some(winner) = winner {
            self.wins[winner] += 1;
        }

        self.round += 1;
        let majority = self.rounds / 2 + 1;
        self.done = self.round >= self.rounds || self.wins.iter().any(|w| *w >= majority);
        winner
    }
}

impl GameSession for ColonelBlotto {
    fn reset(
        &mut self,
        num_players: usize,
        _seed: Option<u64>,
    ) -> Result<Observation, EnvironmentError> {
        if num_players != 2 {
            return Err(EnvironmentError::failed(
                EnvOperation::Reset,
                format!("colonel blotto is a two player game, got {num_players}"),
            ));
        }
        *self = Self::with_rounds(self.rounds);
        self.started = true;

        Ok(Observation::new(format!(
            "Colonel Blotto: split {TROOPS} troops over fields A, B and C, e.g. [A7 B7 C6]. \
             Win more fields than your opponent to take the round. Best of {}.",
            self.rounds
        )))
    }

    fn get_observation(&mut self) -> Result<(PlayerId, Observation), EnvironmentError> {
        if !self.started {
            return Err(not_started(EnvOperation::GetObservation));
        }
        if self.done {
            return Err(already_over(EnvOperation::GetObservation));
        }
        let seat = self.seat();
        let text = format!(
            "Round {}/{}, Commander {seat}. Rounds won: {} to {}. Allocate {TROOPS} troops as \
             [A? B? C?].",
            self.round + 1,
            self.rounds,
            self.wins[0],
            self.wins[1]
        );
        Ok((PlayerId(seat as u32), Observation::new(text)))
    }

    fn step(&mut self, action: &Action) -> Result<StepReport, EnvironmentError> {
        if !self.started {
            return Err(not_started(EnvOperation::Step));
        }
        if self.done {
            return Err(already_over(EnvOperation::Step));
        }

        let parsed = parse_allocation(bracketed(action.as_str()));
        let allocation = parsed.unwrap_or([7, 7, 6]);
        let mut report = StepReport::running().with_info("player", self.seat());
        if parsed.is_none() {
            report = report.with_info("invalid_move", true);
        }

        match self.pending.take() {
            None => self.pending = Some(allocation),
            Some(first) => {
                let winner = self.settle(first, allocation);
                report = report
                    .with_info("round", self.round)
                    .with_info("round_winner", winner.map(|w| w as u64));
            }
        }

        report.done = self.done;
        Ok(report)
    }

    fn close(&mut self) -> Result<FinalReport, EnvironmentError> {
        let (first, second) = match self.wins[0].cmp(&self.wins[1]) {
            std::cmp::Ordering::Greater => (1.0, 0.0),
            std::cmp::Ordering::Less => (0.0, 1.0),
            std::cmp::Ordering::Equal => (0.5, 0.5),
        };

        let mut report = FinalReport::default();
        if self.started {
            report.rewards.insert(PlayerId(0), first);
            report.rewards.insert(PlayerId(1), second);
        }
        report
            .info
            .insert("rounds_won".into(), serde_json::json!(self.wins));
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocations_must_cover_every_field_once() {
        assert_eq!(parse_allocation("A7 B7 C6"), Some([7, 7, 6]));
        assert_eq!(parse_allocation("c10, a5, b5"), Some([5, 5, 10]));
        assert_eq!(parse_allocation("A7 B7"), None);
        assert_eq!(parse_allocation("A7 A7 C6"), None);
        assert_eq!(parse_allocation("A10 B10 C10"), None);
        assert_eq!(parse_allocation("D20"), None);
    }

    #[test]
    fn majority_ends_the_match_early() {
        let mut game = ColonelBlotto::default();
        game.reset(2, None).unwrap();

        for _ in 0..2 {
            assert_eq!(game.get_observation().unwrap().0, PlayerId(0));
            game.step(&Action::new("[A10 B10 C0]")).unwrap();
            assert_eq!(game.get_observation().unwrap().0, PlayerId(1));
            game.step(&Action::new("[A0 B0 C20]")).unwrap();
        }

        assert_eq!(game.wins(), [2, 0]);
        assert!(game.get_observation().is_err());
        let report = game.close().unwrap();
        assert_eq!(report.rewards[&PlayerId(0)], 1.0);
        assert_eq!(report.rewards[&PlayerId(1)], 0.0);
    }

    #[test]
    fn only_two_players_may_sit() {
        let mut game = ColonelBlotto::default();
        let err = game.reset(3, None).unwrap_err();
        assert_eq!(err.operation(), EnvOperation::Reset);
    }

    #[test]
    fn malformed_orders_fall_back_to_even_split() {
        let mut game = ColonelBlotto::with_rounds(1);
        game.reset(2, None).unwrap();

        let first = game.step(&Action::new("all in!")).unwrap();
        assert_eq!(first.info["invalid_move"], true);
        let second = game.step(&Action::new("[A7 B7 C6]")).unwrap();
        assert!(second.done);
        assert!(second.info["round_winner"].is_null());
    }
}
