//! Shared fakes for engine integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use arena_core::{
    Action, EnvOperation, EnvironmentError, FinalReport, GameSession, Observation, PlayerId,
    Rewards, StepReport,
};
use arena_runtime::{ActionProducer, ProducerError};
use async_trait::async_trait;

/// What the fake environment saw, readable after the engine consumed it.
#[derive(Debug, Default)]
pub struct Probe {
    closes: AtomicUsize,
    actions: Mutex<Vec<(PlayerId, String)>>,
}

impl Probe {
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn actions(&self) -> Vec<(PlayerId, String)> {
        self.actions.lock().unwrap().clone()
    }
}

/// Seats take turns in order; player 0 wins on close.
pub struct RoundRobin {
    probe: Arc<Probe>,
    players: u32,
    length: u32,
    steps: u32,
    fail_step_at: Option<u32>,
    fail_reset: bool,
    fail_close: bool,
    address_override: Option<PlayerId>,
}

impl RoundRobin {
    /// A game that reports `done` after `length` steps.
    pub fn new(length: u32) -> (Self, Arc<Probe>) {
        let probe = Arc::new(Probe::default());
        let env = Self {
            probe: Arc::clone(&probe),
            players: 0,
            length,
            steps: 0,
            fail_step_at: None,
            fail_reset: false,
            fail_close: false,
            address_override: None,
        };
        (env, probe)
    }

    /// Make `step` fail once `steps` actions have been applied.
    pub fn failing_step_at(mut self, steps: u32) -> Self {
        self.fail_step_at = Some(steps);
        self
    }

    pub fn failing_reset(mut self) -> Self {
        self.fail_reset = true;
        self
    }

    /// Count the close, then report it as failed.
    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// Always address `player`, registered or not.
    pub fn addressing(mut self, player: PlayerId) -> Self {
        self.address_override = Some(player);
        self
    }
}

impl GameSession for RoundRobin {
    fn reset(
        &mut self,
        num_players: usize,
        _seed: Option<u64>,
    ) -> Result<Observation, EnvironmentError> {
        if self.fail_reset {
            return Err(EnvironmentError::failed(EnvOperation::Reset, "no table"));
        }
        self.players = num_players as u32;
        self.steps = 0;
        Ok(Observation::new("the game begins"))
    }

    fn get_observation(&mut self) -> Result<(PlayerId, Observation), EnvironmentError> {
        if self.players == 0 {
            return Err(EnvironmentError::out_of_order(
                EnvOperation::GetObservation,
                "reset first",
            ));
        }
        let player = self
            .address_override
            .unwrap_or(PlayerId(self.steps % self.players));
        Ok((player, Observation::new(format!("step {}", self.steps))))
    }

    fn step(&mut self, action: &Action) -> Result<StepReport, EnvironmentError> {
        if self.fail_step_at == Some(self.steps) {
            return Err(EnvironmentError::failed(EnvOperation::Step, "board on fire"));
        }
        let player = PlayerId(self.steps % self.players.max(1));
        self.probe
            .actions
            .lock()
            .unwrap()
            .push((player, action.as_str().to_owned()));
        self.steps += 1;

        Ok(StepReport {
            done: self.steps >= self.length,
            ..StepReport::default()
        }
        .with_info("steps", self.steps))
    }

    fn close(&mut self) -> Result<FinalReport, EnvironmentError> {
        self.probe.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(EnvironmentError::failed(EnvOperation::Close, "scoreboard lost"));
        }
        let rewards: Rewards = (0..self.players)
            .map(|p| (PlayerId(p), if p == 0 { 1.0 } else { 0.0 }))
            .collect();
        Ok(FinalReport {
            rewards,
            ..FinalReport::default()
        })
    }
}

/// Interactive producer that answers on its own when called in-line.
#[derive(Debug, Clone)]
pub struct AutoHuman(pub &'static str);

#[async_trait]
impl ActionProducer for AutoHuman {
    async fn act(
        &self,
        _player: PlayerId,
        _observation: &Observation,
    ) -> Result<Action, ProducerError> {
        Ok(Action::new(self.0))
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

/// Producer that fails its first `failures` calls and records every observation.
#[derive(Debug, Default)]
pub struct Flaky {
    failures: usize,
    seen: Mutex<Vec<String>>,
}

impl Flaky {
    pub fn new(failures: usize) -> Self {
        Self {
            failures,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActionProducer for Flaky {
    async fn act(
        &self,
        _player: PlayerId,
        observation: &Observation,
    ) -> Result<Action, ProducerError> {
        let mut seen = self.seen.lock().unwrap();
        seen.push(observation.as_str().to_owned());
        if seen.len() <= self.failures {
            return Err(ProducerError::failed("model timed out"));
        }
        Ok(Action::new("steady"))
    }
}

/// Shares one producer between a registry and the test body.
pub struct Shared<P>(pub Arc<P>);

#[async_trait]
impl<P: ActionProducer> ActionProducer for Shared<P> {
    async fn act(
        &self,
        player: PlayerId,
        observation: &Observation,
    ) -> Result<Action, ProducerError> {
        self.0.act(player, observation).await
    }

    fn is_interactive(&self) -> bool {
        self.0.is_interactive()
    }
}
