use std::collections::{BTreeMap, VecDeque};

use arena_core::{
    Action, EnvOperation, EnvironmentError, FinalReport, GameSession, Observation, PlayerId,
    StepReport,
};
use rand::seq::SliceRandom;

use super::{already_over, bracketed, not_started, seeded_rng};

const MAFIA_COUNT: usize = 2;
/// The village loses if the mafia survive this many days.
const MAX_DAYS: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
enum Role {
    Mafia,
    Villager,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
enum Phase {
    Night,
    Day,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
enum Faction {
    Village,
    Mafia,
}

impl Role {
    fn faction(self) -> Faction {
        match self {
            Self::Mafia => Faction::Mafia,
            Self::Villager => Faction::Village,
        }
    }
}

/// Hidden-role elimination game.
///
/// Two mafia pick a victim each night; at day the living vote someone out by
/// plurality (a tie eliminates nobody). Votes are seat numbers in brackets;
/// anything else abstains.
#[derive(Debug, Default)]
pub struct SecretMafia {
    roles: Vec<Role>,
    alive: Vec<bool>,
    phase: Option<Phase>,
    day: u32,
    queue: VecDeque<usize>,
    votes: BTreeMap<usize, usize>,
    winner: Option<Faction>,
}

impl SecretMafia {
    fn living(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.alive.len()).filter(|seat| self.alive[*seat])
    }

    fn living_with(&self, role: Role) -> usize {
        self.living().filter(|seat| self.roles[*seat] == role).count()
    }

    fn open_phase(&mut self, phase: Phase) {
        self.phase = Some(phase);
        self.votes.clear();
        self.queue = match phase {
            Phase::Night => self
                .living()
                .filter(|seat| self.roles[*seat] == Role::Mafia)
                .collect(),
            Phase::Day => self.living().collect(),
        };
    }

    fn valid_target(&self, phase: Phase, voter: usize, target: usize) -> bool {
        target < self.alive.len()
            && self.alive[target]
            && target != voter
            && (phase == Phase::Day || self.roles[target] != Role::Mafia)
    }

    /// Plurality winner of the phase's votes; `None` on a tie or no votes.
    fn tally(&self) -> Option<usize> {
        let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
        for target in self.votes.values() {
            *counts.entry(*target).or_default() += 1;
        }
        let best = counts.values().copied().max()?;
        let mut leaders = counts.iter().filter(|(_, n)| **n == best);
        match (leaders.next(), leaders.next()) {
            (Some((target, _)), None) => Some(*target),
            _ => None,
        }
    }

    fn check_winner(&self) -> Option<Faction> {
        let mafia = self.living_with(Role::Mafia);
        if mafia == 0 {
            Some(Faction::Village)
        } else if mafia >= self.living_with(Role::Villager) {
            Some(Faction::Mafia)
        } else {
            None
        }
    }

    fn alive_list(&self) -> String {
        self.living()
            .map(|seat| seat.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl GameSession for SecretMafia {
    fn reset(
        &mut self,
        num_players: usize,
        seed: Option<u64>,
    ) -> Result<Observation, EnvironmentError> {
        if num_players <= MAFIA_COUNT * 2 {
            return Err(EnvironmentError::failed(
                EnvOperation::Reset,
                format!("secret mafia needs more than {} players", MAFIA_COUNT * 2),
            ));
        }

        let mut seats: Vec<usize> = (0..num_players).collect();
        seats.shuffle(&mut seeded_rng(seed));
        let mut roles = vec![Role::Villager; num_players];
        for seat in &seats[..MAFIA_COUNT] {
            roles[*seat] = Role::Mafia;
        }

        *self = Self {
            roles,
            alive: vec![true; num_players],
            day: 1,
            ..Self::default()
        };
        self.open_phase(Phase::Night);
        tracing::debug!(players = num_players, "secret mafia reset");

        Ok(Observation::new(format!(
            "Secret Mafia with {num_players} players: {MAFIA_COUNT} mafia hide in the village. Night falls."
        )))
    }

    fn get_observation(&mut self) -> Result<(PlayerId, Observation), EnvironmentError> {
        let Some(phase) = self.phase else {
            return Err(not_started(EnvOperation::GetObservation));
        };
        if self.winner.is_some() {
            return Err(already_over(EnvOperation::GetObservation));
        }
        let Some(&seat) = self.queue.front() else {
            return Err(already_over(EnvOperation::GetObservation));
        };

        let role = self.roles[seat];
        let partners = match role {
            Role::Mafia => {
                let others: Vec<String> = (0..self.roles.len())
                    .filter(|other| *other != seat && self.roles[*other] == Role::Mafia)
                    .map(|other| other.to_string())
                    .collect();
                format!(" with {}", others.join(", "))
            }
            Role::Villager => String::new(),
        };
        let prompt = match phase {
            Phase::Night => "Choose a villager to eliminate with [n].",
            Phase::Day => "Vote someone out with [n].",
        };
        let text = format!(
            "Player {seat}, you are {role}{partners}. {phase} {}. Alive: {}. {prompt}",
            self.day,
            self.alive_list()
        );
        Ok((PlayerId(seat as u32), Observation::new(text)))
    }

    fn step(&mut self, action: &Action) -> Result<StepReport, EnvironmentError> {
        let Some(phase) = self.phase else {
            return Err(not_started(EnvOperation::Step));
        };
        if self.winner.is_some() {
            return Err(already_over(EnvOperation::Step));
        }
        let Some(voter) = self.queue.pop_front() else {
            return Err(already_over(EnvOperation::Step));
        };

        let target = bracketed(action.as_str())
            .parse::<usize>()
            .ok()
            .filter(|target| self.valid_target(phase, voter, *target));
        let mut report = StepReport::running();
        match target {
            Some(target) => {
                self.votes.insert(voter, target);
                report = report.with_info("vote", target);
            }
            None => report = report.with_info("invalid_move", true),
        }

        if !self.queue.is_empty() {
            return Ok(report);
        }

        if let Some(eliminated) = self.tally() {
            self.alive[eliminated] = false;
            report = report.with_info("eliminated", eliminated);
        }
        self.winner = self.check_winner();

        if self.winner.is_none() {
            match phase {
                Phase::Night => self.open_phase(Phase::Day),
                Phase::Day if self.day >= MAX_DAYS => self.winner = Some(Faction::Mafia),
                Phase::Day => {
                    self.day += 1;
                    self.open_phase(Phase::Night);
                }
            }
        }

        if let Some(winner) = self.winner {
            report.done = true;
            report = report.with_info("winner", winner.to_string());
        }
        Ok(report)
    }

    fn close(&mut self) -> Result<FinalReport, EnvironmentError> {
        let mut report = FinalReport::default();
        for (seat, role) in self.roles.iter().enumerate() {
            let reward = if Some(role.faction()) == self.winner {
                1.0
            } else {
                0.0
            };
            report.rewards.insert(PlayerId(seat as u32), reward);
        }
        if let Some(winner) = self.winner {
            report.info.insert("winner".into(), winner.to_string().into());
        }
        let mafia: Vec<usize> = (0..self.roles.len())
            .filter(|seat| self.roles[*seat] == Role::Mafia)
            .collect();
        report.info.insert("mafia".into(), mafia.into());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(game: &mut SecretMafia, policy: impl Fn(&SecretMafia, usize) -> String) -> u32 {
        let mut steps = 0;
        loop {
            let (player, _) = game.get_observation().unwrap();
            let action = policy(game, player.get() as usize);
            steps += 1;
            if game.step(&Action::new(action)).unwrap().done {
                return steps;
            }
        }
    }

    fn first_living(game: &SecretMafia, role: Role) -> usize {
        game.living()
            .find(|seat| game.roles[*seat] == role)
            .unwrap()
    }

    #[test]
    fn seed_fixes_two_mafia() {
        let mut a = SecretMafia::default();
        let mut b = SecretMafia::default();
        a.reset(7, Some(4)).unwrap();
        b.reset(7, Some(4)).unwrap();

        assert_eq!(a.roles, b.roles);
        assert_eq!(a.living_with(Role::Mafia), 2);
        assert_eq!(a.living_with(Role::Villager), 5);
    }

    #[test]
    fn night_is_for_the_mafia_only() {
        let mut game = SecretMafia::default();
        game.reset(7, Some(2)).unwrap();

        let (player, observation) = game.get_observation().unwrap();
        assert_eq!(game.roles[player.get() as usize], Role::Mafia);
        assert!(observation.as_str().contains("you are mafia with"));
    }

    #[test]
    fn village_wins_by_voting_out_both_mafia() {
        let mut game = SecretMafia::default();
        game.reset(7, Some(11)).unwrap();

        play(&mut game, |game, seat| {
            let mafia = first_living(game, Role::Mafia);
            let villager = first_living(game, Role::Villager);
            match game.phase {
                Some(Phase::Night) => format!("[{villager}]"),
                _ if seat == mafia => format!("[{villager}]"),
                _ => format!("[{mafia}]"),
            }
        });

        let report = game.close().unwrap();
        assert_eq!(report.info["winner"], "village");
        for (seat, role) in game.roles.iter().enumerate() {
            let expected = if *role == Role::Villager { 1.0 } else { 0.0 };
            assert_eq!(report.rewards[&PlayerId(seat as u32)], expected);
        }
    }

    #[test]
    fn mafia_win_when_the_village_never_agrees() {
        let mut game = SecretMafia::default();
        game.reset(7, Some(5)).unwrap();

        let steps = play(&mut game, |_, _| "[pass]".to_owned());

        // Two night votes and seven day votes per day, nobody ever removed.
        assert_eq!(steps, MAX_DAYS * 9);
        assert_eq!(game.close().unwrap().info["winner"], "mafia");
    }

    #[test]
    fn self_votes_abstain() {
        let mut game = SecretMafia::default();
        game.reset(7, Some(3)).unwrap();
        let (player, _) = game.get_observation().unwrap();

        let report = game
            .step(&Action::new(format!("[{}]", player.get())))
            .unwrap();
        assert_eq!(report.info["invalid_move"], true);
    }

    #[test]
    fn small_tables_are_rejected() {
        assert!(SecretMafia::default().reset(4, None).is_err());
    }
}
