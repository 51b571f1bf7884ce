use arena_core::{
    Action, EnvOperation, EnvironmentError, FinalReport, GameSession, Observation, PlayerId,
    StepReport,
};
use rand::seq::SliceRandom;

use super::{already_over, bracketed, not_started, seeded_rng};

pub(crate) const WORDS: [&str; 25] = [
    "anchor", "apple", "bank", "bridge", "castle", "cloud", "comet", "crown", "desert", "dragon",
    "engine", "forest", "ghost", "glove", "harbor", "island", "jungle", "knight", "laser",
    "mirror", "needle", "orbit", "piano", "rocket", "violin",
];

const RED_WORDS: usize = 9;
const BLUE_WORDS: usize = 8;
const NEUTRAL_WORDS: usize = 7;
/// Clue and guess pairs before the board is scored as it stands.
const MAX_TURNS: u32 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
enum Team {
    Red,
    Blue,
}

impl Team {
    fn other(self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }

    /// Spymaster seat; the guesser sits right after.
    fn spymaster(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Blue => 2,
        }
    }

    fn of_seat(seat: usize) -> Self {
        if seat < 2 { Self::Red } else { Self::Blue }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Card {
    Agent(Team),
    Bystander,
    Assassin,
}

impl Card {
    fn label(self) -> &'static str {
        match self {
            Self::Agent(Team::Red) => "red",
            Self::Agent(Team::Blue) => "blue",
            Self::Bystander => "neutral",
            Self::Assassin => "assassin",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Verdict {
    Won(Team),
    Draw,
}

/// Two teams of spymaster and guesser race to uncover their agents.
///
/// Seats 0 and 1 are red, 2 and 3 blue. A spymaster gives a clue as
/// `[word number]`; the guesser then names one word in brackets. Each clue
/// gets a single guess.
#[derive(Debug, Default)]
pub struct Codenames {
    cards: Vec<Card>,
    revealed: Vec<bool>,
    to_move: Option<Team>,
    giving_clue: bool,
    clue: String,
    turns: u32,
    verdict: Option<Verdict>,
}

impl Codenames {
    fn remaining(&self, team: Team) -> usize {
        self.cards
            .iter()
            .zip(&self.revealed)
            .filter(|(card, revealed)| **card == Card::Agent(team) && !**revealed)
            .count()
    }

    fn board(&self, with_key: bool) -> String {
        WORDS
            .iter()
            .enumerate()
            .map(|(i, word)| {
                if self.revealed[i] {
                    format!("({})", self.cards[i].label())
                } else if with_key {
                    format!("{word}:{}", self.cards[i].label())
                } else {
                    (*word).to_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn score_board(&self) -> Verdict {
        let red = self.remaining(Team::Red);
        let blue = self.remaining(Team::Blue);
        match red.cmp(&blue) {
            std::cmp::Ordering::Less => Verdict::Won(Team::Red),
            std::cmp::Ordering::Greater => Verdict::Won(Team::Blue),
            std::cmp::Ordering::Equal => Verdict::Draw,
        }
    }
}

impl GameSession for Codenames {
    fn reset(
        &mut self,
        num_players: usize,
        seed: Option<u64>,
    ) -> Result<Observation, EnvironmentError> {
        if num_players != 4 {
            return Err(EnvironmentError::failed(
                EnvOperation::Reset,
                "codenames is played by exactly four players",
            ));
        }

        let mut cards = Vec::with_capacity(WORDS.len());
        cards.extend([Card::Agent(Team::Red); RED_WORDS]);
        cards.extend([Card::Agent(Team::Blue); BLUE_WORDS]);
        cards.extend([Card::Bystander; NEUTRAL_WORDS]);
        cards.push(Card::Assassin);
        cards.shuffle(&mut seeded_rng(seed));

        *self = Self {
            cards,
            revealed: vec![false; WORDS.len()],
            to_move: Some(Team::Red),
            giving_clue: true,
            ..Self::default()
        };
        tracing::debug!("codenames reset");

        Ok(Observation::new(format!(
            "Codenames: red finds {RED_WORDS} agents, blue {BLUE_WORDS}. Avoid the assassin. Red starts."
        )))
    }

    fn get_observation(&mut self) -> Result<(PlayerId, Observation), EnvironmentError> {
        let Some(team) = self.to_move else {
            return Err(not_started(EnvOperation::GetObservation));
        };
        if self.verdict.is_some() {
            return Err(already_over(EnvOperation::GetObservation));
        }

        let (seat, text) = if self.giving_clue {
            let seat = team.spymaster();
            (
                seat,
                format!(
                    "Player {seat}, {team} spymaster. Key: {}. Give a clue as [word number].",
                    self.board(true)
                ),
            )
        } else {
            let seat = team.spymaster() + 1;
            (
                seat,
                format!(
                    "Player {seat}, {team} guesser. Clue: {}. Board: {}. Guess one word in brackets.",
                    self.clue,
                    self.board(false)
                ),
            )
        };
        Ok((PlayerId(seat as u32), Observation::new(text)))
    }

    fn step(&mut self, action: &Action) -> Result<StepReport, EnvironmentError> {
        let Some(team) = self.to_move else {
            return Err(not_started(EnvOperation::Step));
        };
        if self.verdict.is_some() {
            return Err(already_over(EnvOperation::Step));
        }

        if self.giving_clue {
            self.clue = bracketed(action.as_str()).to_owned();
            self.giving_clue = false;
            return Ok(StepReport::running().with_info("clue", self.clue.clone()));
        }

        let guess = bracketed(action.as_str()).to_ascii_lowercase();
        let mut report = StepReport::running();
        match WORDS
            .iter()
            .position(|word| *word == guess)
            .filter(|i| !self.revealed[*i])
        {
            Some(i) => {
                self.revealed[i] = true;
                let card = self.cards[i];
                report = report
                    .with_info("revealed", WORDS[i])
                    .with_info("card", card.label());
                self.verdict = match card {
                    Card::Assassin => Some(Verdict::Won(team.other())),
                    Card::Agent(owner) if self.remaining(owner) == 0 => Some(Verdict::Won(owner)),
                    _ => None,
                };
            }
            None => report = report.with_info("invalid_move", true),
        }

        self.turns += 1;
        if self.verdict.is_none() && self.turns >= MAX_TURNS {
            self.verdict = Some(self.score_board());
        }
        self.to_move = Some(team.other());
        self.giving_clue = true;

        if let Some(verdict) = self.verdict {
            report.done = true;
            let winner = match verdict {
                Verdict::Won(team) => team.to_string(),
                Verdict::Draw => "draw".to_owned(),
            };
            report = report.with_info("winner", winner);
        }
        Ok(report)
    }

    fn close(&mut self) -> Result<FinalReport, EnvironmentError> {
        let mut report = FinalReport::default();
        if self.to_move.is_none() {
            return Ok(report);
        }
        for seat in 0..4 {
            let reward = match self.verdict {
                Some(Verdict::Won(team)) if team == Team::of_seat(seat) => 1.0,
                Some(Verdict::Draw) => 0.5,
                _ => 0.0,
            };
            report.rewards.insert(PlayerId(seat as u32), reward);
        }
        report
            .info
            .insert("red_remaining".into(), self.remaining(Team::Red).into());
        report
            .info
            .insert("blue_remaining".into(), self.remaining(Team::Blue).into());
        Ok(report)
    }
}
