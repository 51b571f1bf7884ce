//! Turn dispatch engine.
//!
//! [`TurnEngine`] owns one [`GameSession`] and drives it through
//! `reset → (observe → act → step)* → close`. Two driving styles are offered:
//!
//! - [`TurnEngine::run`] loops in-line, awaiting every producer, and returns
//!   the final [`GameResult`].
//! - [`TurnEngine::advance`] executes one turn at a time and suspends whenever
//!   an interactive producer holds the seat; the caller answers through
//!   [`TurnEngine::submit_action`].
//!
//! All methods take `&self`, so the engine can be shared behind an `Arc`
//! between a driver task and an input thread.

mod config;
mod machine;
mod outcome;
mod pending;
mod status;

use std::sync::Arc;

use arena_core::{Action, GameSession, PlayerId};
use tokio::sync::{Mutex, broadcast, watch};

pub use config::EngineConfig;
pub use outcome::{GameResult, GameStatus, SessionFailure, SessionOutcome};
pub use pending::PendingTurn;
pub use status::{EnginePhase, EngineStatus, StartInfo, StepOutcome};

use self::machine::{EngineCore, Shared};
use crate::api::{
    ActionProducer, ConfigError, EngineError, PlayerRegistry, Result, SubmissionRejection,
};
use crate::events::{EngineEvent, EventBus, EventSink, Fanout, Topic};

/// Drives a single game session.
pub struct TurnEngine {
    core: Mutex<EngineCore>,
    shared: Arc<Shared>,
    bus: EventBus,
    sinks: Vec<Arc<dyn EventSink>>,
    config: EngineConfig,
}

impl TurnEngine {
    /// Create an unconfigured engine with default settings.
    pub fn new(session: impl GameSession + 'static) -> Self {
        Self::builder(session).build_unconfigured()
    }

    pub fn builder(session: impl GameSession + 'static) -> EngineBuilder {
        EngineBuilder::new(Box::new(session))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Install the player registry and check it against the required count.
    ///
    /// Allowed once, before [`start`](Self::start). A rejected registry leaves
    /// the engine unconfigured.
    pub async fn configure(
        &self,
        registry: PlayerRegistry,
        required_players: usize,
    ) -> std::result::Result<(), ConfigError> {
        self.core.lock().await.configure(registry, required_players)
    }

    /// Reset the environment and open the session.
    pub async fn start(&self, seed: Option<u64>) -> Result<StartInfo> {
        let sink = self.fanout(None);
        self.core.lock().await.start(seed, &sink)
    }

    /// Drive the session to completion, awaiting every producer in-line.
    ///
    /// `max_steps` replaces the configured budget for this session. `sink`
    /// receives notifications after the engine's own sinks.
    pub async fn run(&self, max_steps: u32, sink: &dyn EventSink) -> Result<GameResult> {
        let sink = self.fanout(Some(sink));
        let mut core = self.core.lock().await;
        core.set_max_steps(max_steps);
        core.run(&sink).await
    }

    /// Execute at most one turn.
    ///
    /// Returns [`StepOutcome::Suspended`] when the seat belongs to an
    /// interactive producer. Calling again while suspended returns the same
    /// pending turn.
    pub async fn advance(&self) -> Result<StepOutcome> {
        let sink = self.fanout(None);
        self.core.lock().await.advance(&sink).await
    }

    /// Advance until the session suspends or finishes.
    pub async fn advance_until_blocked(&self) -> Result<StepOutcome> {
        loop {
            let outcome = self.advance().await?;
            if outcome.is_blocked() {
                return Ok(outcome);
            }
        }
    }

    /// Answer the pending turn on behalf of `player`.
    ///
    /// Rejected with [`EngineError::UnexpectedSubmission`] when nothing is
    /// pending or the turn belongs to someone else. Of two racing submissions
    /// for the same turn exactly one is applied.
    pub async fn submit_action(&self, player: PlayerId, action: impl Into<Action>) -> Result<()> {
        let phase = self.phase();
        if phase != EnginePhase::Suspended {
            return Err(EngineError::unexpected(
                player,
                SubmissionRejection::NotSuspended { phase },
            ));
        }

        let sink = self.fanout(None);
        self.core
            .lock()
            .await
            .submit(player, action.into(), &sink)
    }

    /// Resolve the turn in flight with `producer` instead of the registered one.
    ///
    /// Used after a producer error, or to answer a suspended turn
    /// automatically.
    pub async fn retry_with(&self, producer: &dyn ActionProducer) -> Result<StepOutcome> {
        let sink = self.fanout(None);
        self.core.lock().await.retry_with(producer, &sink).await
    }

    /// The memoized result once the session finished normally.
    pub fn result(&self) -> Option<GameResult> {
        self.shared.outcome.get().and_then(|o| o.result().cloned())
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.shared.outcome.get().cloned()
    }

    pub fn status(&self) -> EngineStatus {
        self.shared.status.borrow().clone()
    }

    pub fn phase(&self) -> EnginePhase {
        self.shared.status.borrow().phase
    }

    pub fn pending(&self) -> Option<PendingTurn> {
        self.shared.status.borrow().pending.clone()
    }

    /// Watch every phase change without touching the engine lock.
    pub fn subscribe_status(&self) -> watch::Receiver<EngineStatus> {
        self.shared.status.subscribe()
    }

    /// Subscribe to one topic of the built-in event bus.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<EngineEvent> {
        self.bus.subscribe(topic)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    fn fanout<'a>(&'a self, extra: Option<&'a dyn EventSink>) -> Fanout<'a> {
        Fanout::new(&self.sinks, extra)
    }
}

impl std::fmt::Debug for TurnEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnEngine")
            .field("status", &self.status())
            .field("sinks", &self.sinks.len())
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for [`TurnEngine`].
pub struct EngineBuilder {
    session: Box<dyn GameSession>,
    config: EngineConfig,
    sinks: Vec<Arc<dyn EventSink>>,
    players: Option<(PlayerRegistry, usize)>,
}

impl EngineBuilder {
    fn new(session: Box<dyn GameSession>) -> Self {
        Self {
            session,
            config: EngineConfig::default(),
            sinks: Vec::new(),
            players: None,
        }
    }

    /// Override engine configuration
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_steps(mut self, max_steps: u32) -> Self {
        self.config.max_steps = max_steps;
        self
    }

    /// Attach a sink that sees every notification of every session phase.
    pub fn sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sinks.push(Arc::new(sink));
        self
    }

    pub fn shared_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Configure players as part of `build`.
    pub fn players(mut self, registry: PlayerRegistry, required_players: usize) -> Self {
        self.players = Some((registry, required_players));
        self
    }

    /// Build the engine, applying [`players`](Self::players) if given.
    pub fn build(mut self) -> std::result::Result<TurnEngine, ConfigError> {
        let players = self.players.take();
        let mut engine = self.build_unconfigured();

        if let Some((registry, required_players)) = players {
            engine
                .core
                .get_mut()
                .configure(registry, required_players)?;
        }

        Ok(engine)
    }

    fn build_unconfigured(self) -> TurnEngine {
        let shared = Arc::new(Shared::new());
        let bus = EventBus::with_capacity(self.config.event_buffer_size);

        let mut sinks = self.sinks;
        sinks.push(Arc::new(bus.clone()));

        TurnEngine {
            core: Mutex::new(EngineCore::new(
                self.session,
                self.config.max_steps,
                Arc::clone(&shared),
            )),
            shared,
            bus,
            sinks,
            config: self.config,
        }
    }
}
