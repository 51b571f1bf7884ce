//! Asynchronous abstraction for sourcing player actions.
//!
//! Runtime users plug in [`ActionProducer`] implementations so a session can
//! run with human input, scripted fixtures, or model-backed policies. The
//! engine never looks at the concrete type: it asks each producer whether it
//! is interactive and picks its dispatch strategy from that answer alone.
use std::collections::VecDeque;

use arena_core::{Action, Observation, PlayerId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::errors::ProducerError;

/// Capability class of a producer, used for bookkeeping and reporting.
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
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ProducerKind {
    /// Returns only after an external actor supplies input.
    Interactive,
    /// Returns on its own after bounded computation.
    Automated,
}

/// Trait for turning an observation into an action.
///
/// Different implementations can handle:
/// - Human input (from a UI, terminal, or web request)
/// - Model-backed policies
/// - Scripted/replayed actions
/// - Testing fixtures
#[async_trait]
pub trait ActionProducer: Send + Sync {
    /// Produce the action for `player` in response to `observation`.
    async fn act(
        &self,
        player: PlayerId,
        observation: &Observation,
    ) -> Result<Action, ProducerError>;

    /// Whether `act` depends on an external actor with unbounded latency.
    ///
    /// Step-driven callers suspend on interactive producers instead of
    /// awaiting them.
    fn is_interactive(&self) -> bool {
        false
    }

    fn kind(&self) -> ProducerKind {
        if self.is_interactive() {
            ProducerKind::Interactive
        } else {
            ProducerKind::Automated
        }
    }

    /// Short label used in logs.
    fn label(&self) -> &str {
        "producer"
    }
}

/// Always returns the same action.
#[derive(Debug, Clone)]
pub struct FixedProducer {
    action: Action,
}

impl FixedProducer {
    pub fn new(action: impl Into<Action>) -> Self {
        Self {
            action: action.into(),
        }
    }
}

#[async_trait]
impl ActionProducer for FixedProducer {
    async fn act(
        &self,
        _player: PlayerId,
        _observation: &Observation,
    ) -> Result<Action, ProducerError> {
        Ok(self.action.clone())
    }

    fn label(&self) -> &str {
        "fixed"
    }
}

/// Answers every observation with its own text.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoProducer;

#[async_trait]
impl ActionProducer for EchoProducer {
    async fn act(
        &self,
        _player: PlayerId,
        observation: &Observation,
    ) -> Result<Action, ProducerError> {
        Ok(Action::new(observation.as_str()))
    }

    fn label(&self) -> &str {
        "echo"
    }
}

/// Replays a fixed list of actions in order.
pub struct ScriptedProducer {
    script: Mutex<VecDeque<Action>>,
}

impl ScriptedProducer {
    pub fn new<I, A>(actions: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Action>,
    {
        Self {
            script: Mutex::new(actions.into_iter().map(Into::into).collect()),
        }
    }

    pub async fn remaining(&self) -> usize {
        self.script.lock().await.len()
    }
}

#[async_trait]
impl ActionProducer for ScriptedProducer {
    async fn act(
        &self,
        _player: PlayerId,
        _observation: &Observation,
    ) -> Result<Action, ProducerError> {
        self.script
            .lock()
            .await
            .pop_front()
            .ok_or(ProducerError::Exhausted)
    }

    fn label(&self) -> &str {
        "scripted"
    }
}

/// Wraps a synchronous closure.
pub struct FnProducer<F> {
    f: F,
}

impl<F> FnProducer<F>
where
    F: Fn(PlayerId, &Observation) -> Result<Action, ProducerError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> ActionProducer for FnProducer<F>
where
    F: Fn(PlayerId, &Observation) -> Result<Action, ProducerError> + Send + Sync,
{
    async fn act(
        &self,
        player: PlayerId,
        observation: &Observation,
    ) -> Result<Action, ProducerError> {
        (self.f)(player, observation)
    }

    fn label(&self) -> &str {
        "fn"
    }
}
