//! Turn state machine shared by the blocking loop and the step driver.
//!
//! [`EngineCore`] is only ever touched through the engine's mutex, so each
//! method runs a sequence of transitions without interference. Every change of
//! phase is mirrored into the shared status channel.

use std::sync::{Arc, OnceLock};

use arena_core::{
    Action, EnvironmentError, FinalReport, GameError, GameSession, Info, Observation, PlayerId,
};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::outcome::{GameResult, GameStatus, SessionFailure, SessionOutcome};
use super::pending::PendingTurn;
use super::status::{EnginePhase, EngineStatus, StartInfo, StepOutcome};
use crate::api::{
    ActionProducer, ConfigError, EngineError, PlayerRegistry, Result, SubmissionRejection,
};
use crate::events::EventSink;

/// State visible outside the engine lock.
pub(crate) struct Shared {
    pub(crate) status: watch::Sender<EngineStatus>,
    pub(crate) outcome: OnceLock<SessionOutcome>,
}

impl Shared {
    pub(crate) fn new() -> Self {
        Self {
            status: watch::Sender::new(EngineStatus::default()),
            outcome: OnceLock::new(),
        }
    }
}

/// Observation handed to a producer that has not answered yet.
struct InFlight {
    player: PlayerId,
    observation: Observation,
    producer: Arc<dyn ActionProducer>,
}

pub(crate) struct EngineCore {
    session: Box<dyn GameSession>,
    registry: Option<PlayerRegistry>,
    required_players: usize,
    phase: EnginePhase,
    in_flight: Option<InFlight>,
    pending: Option<PendingTurn>,
    turn: u32,
    max_steps: u32,
    close_attempted: bool,
    shared: Arc<Shared>,
}

impl EngineCore {
    pub(crate) fn new(session: Box<dyn GameSession>, max_steps: u32, shared: Arc<Shared>) -> Self {
        Self {
            session,
            registry: None,
            required_players: 0,
            phase: EnginePhase::Unconfigured,
            in_flight: None,
            pending: None,
            turn: 0,
            max_steps,
            close_attempted: false,
            shared,
        }
    }

    fn set_phase(&mut self, phase: EnginePhase) {
        self.phase = phase;
        self.shared.status.send_replace(EngineStatus {
            phase,
            turn: self.turn,
            pending: self.pending.clone(),
        });
    }

    pub(crate) fn configure(
        &mut self,
        registry: PlayerRegistry,
        required_players: usize,
    ) -> std::result::Result<(), ConfigError> {
        if self.phase != EnginePhase::Unconfigured {
            return Err(ConfigError::AlreadyConfigured);
        }
        if registry.is_empty() {
            warn!("rejecting configuration: no players registered");
            return Err(ConfigError::EmptyRegistry);
        }
        if !registry.validate_count(required_players) {
            warn!(
                required = required_players,
                actual = registry.len(),
                "rejecting configuration: wrong player count"
            );
            return Err(ConfigError::PlayerCount {
                required: required_players,
                actual: registry.len(),
            });
        }

        info!(
            players = registry.len(),
            human = registry.interactive_players().len(),
            "engine configured"
        );
        self.registry = Some(registry);
        self.required_players = required_players;
        self.set_phase(EnginePhase::Configured);
        Ok(())
    }

    pub(crate) fn start(&mut self, seed: Option<u64>, sink: &dyn EventSink) -> Result<StartInfo> {
        match self.phase {
            EnginePhase::Unconfigured => return Err(ConfigError::NotConfigured.into()),
            EnginePhase::Configured => {}
            _ => return Err(EngineError::AlreadyStarted),
        }
        let num_players = self.required_players;

        let initial_observation = match self.session.reset(num_players, seed) {
            Ok(observation) => observation,
            Err(err) => return Err(self.environment_fault(err, sink)),
        };

        self.turn = 0;
        self.set_phase(EnginePhase::AwaitingObservation);
        info!(num_players, ?seed, max_steps = self.max_steps, "session started");

        Ok(StartInfo {
            num_players,
            initial_observation,
            seed,
        })
    }

    pub(crate) fn set_max_steps(&mut self, max_steps: u32) {
        self.max_steps = max_steps;
    }

    /// Run at most one turn, suspending on interactive seats.
    pub(crate) async fn advance(&mut self, sink: &dyn EventSink) -> Result<StepOutcome> {
        match self.phase {
            EnginePhase::Unconfigured | EnginePhase::Configured => Err(EngineError::NotStarted),
            EnginePhase::ApplyingStep => Err(EngineError::Busy),
            EnginePhase::Terminal | EnginePhase::Failed => self.finished_outcome(),
            EnginePhase::Suspended => match &self.pending {
                Some(pending) => Ok(StepOutcome::Suspended(pending.clone())),
                None => Err(EngineError::NoPendingTurn),
            },
            EnginePhase::AwaitingObservation => {
                if !self.observe(sink)? {
                    return self.finished_outcome();
                }
                self.dispatch(sink).await
            }
            EnginePhase::AwaitingAction => self.dispatch(sink).await,
        }
    }

    /// Drive turns in-line until the session ends.
    pub(crate) async fn run(&mut self, sink: &dyn EventSink) -> Result<GameResult> {
        loop {
            match self.phase {
                EnginePhase::Unconfigured | EnginePhase::Configured => {
                    return Err(EngineError::NotStarted);
                }
                EnginePhase::ApplyingStep => return Err(EngineError::Busy),
                EnginePhase::Terminal | EnginePhase::Failed => break,
                EnginePhase::AwaitingObservation => {
                    self.observe(sink)?;
                }
                EnginePhase::Suspended => self.resume_in_line()?,
                EnginePhase::AwaitingAction => {
                    let Some(in_flight) = &self.in_flight else {
                        return Err(EngineError::NoPendingTurn);
                    };
                    let producer = Arc::clone(&in_flight.producer);
                    let (player, action) = self.produce(producer.as_ref()).await?;
                    self.apply(player, action, sink)?;
                }
            }
        }

        match self.shared.outcome.get() {
            Some(SessionOutcome::Finished(result)) => Ok(result.clone()),
            Some(SessionOutcome::Failed(failure)) => Err(EngineError::SessionFailed {
                reason: failure.reason.clone(),
            }),
            None => Err(EngineError::NotStarted),
        }
    }

    /// Consume the pending turn with an externally supplied action.
    pub(crate) fn submit(
        &mut self,
        player: PlayerId,
        action: Action,
        sink: &dyn EventSink,
    ) -> Result<()> {
        if self.phase != EnginePhase::Suspended {
            return Err(EngineError::unexpected(
                player,
                SubmissionRejection::NotSuspended { phase: self.phase },
            ));
        }
        match &self.pending {
            Some(pending) if pending.is_for(player) => {}
            Some(pending) => {
                return Err(EngineError::unexpected(
                    player,
                    SubmissionRejection::WrongPlayer {
                        expected: pending.player,
                    },
                ));
            }
            None => {
                return Err(EngineError::unexpected(
                    player,
                    SubmissionRejection::NotSuspended { phase: self.phase },
                ));
            }
        }

        self.pending = None;
        debug!(%player, turn = self.turn, "pending turn resolved by submission");
        self.apply(player, action, sink).map(|_| ())
    }

    /// Answer the turn in flight with a substitute producer.
    pub(crate) async fn retry_with(
        &mut self,
        producer: &dyn ActionProducer,
        sink: &dyn EventSink,
    ) -> Result<StepOutcome> {
        match self.phase {
            EnginePhase::Suspended => self.resume_in_line()?,
            EnginePhase::AwaitingAction => {}
            _ => return Err(EngineError::NoPendingTurn),
        }
        let (player, action) = self.produce(producer).await?;
        self.apply(player, action, sink)
    }

    /// AwaitingObservation → AwaitingAction.
    ///
    /// Returns `false` when the step budget ended the session instead.
    fn observe(&mut self, sink: &dyn EventSink) -> Result<bool> {
        if self.turn >= self.max_steps {
            self.finish(GameStatus::MaxStepsReached, sink)?;
            return Ok(false);
        }

        let (player, observation) = match self.session.get_observation() {
            Ok(addressed) => addressed,
            Err(err) => return Err(self.environment_fault(err, sink)),
        };
        sink.on_observation(player, &observation);

        let producer = match self.registry.as_ref().map(|registry| registry.resolve(player)) {
            Some(Ok(producer)) => producer,
            Some(Err(_)) | None => {
                error!(%player, "environment addressed an unregistered player");
                let err = EngineError::UnknownPlayer { player };
                self.fail(&err, sink);
                return Err(err);
            }
        };

        self.in_flight = Some(InFlight {
            player,
            observation,
            producer,
        });
        self.set_phase(EnginePhase::AwaitingAction);
        Ok(true)
    }

    /// AwaitingAction → Suspended, or → ApplyingStep for automated seats.
    async fn dispatch(&mut self, sink: &dyn EventSink) -> Result<StepOutcome> {
        let Some(in_flight) = &self.in_flight else {
            return Err(EngineError::NoPendingTurn);
        };

        if in_flight.producer.is_interactive() {
            let pending =
                PendingTurn::issue(in_flight.player, in_flight.observation.clone(), self.turn);
            self.in_flight = None;
            self.pending = Some(pending.clone());
            self.set_phase(EnginePhase::Suspended);
            info!(player = %pending.player, turn = pending.turn, "suspended for input");
            sink.on_suspended(&pending);
            return Ok(StepOutcome::Suspended(pending));
        }

        let producer = Arc::clone(&in_flight.producer);
        let (player, action) = self.produce(producer.as_ref()).await?;
        self.apply(player, action, sink)
    }

    /// Turn the pending handle back into an in-flight turn for in-line resolution.
    fn resume_in_line(&mut self) -> Result<()> {
        let Some(pending) = self.pending.take() else {
            return Err(EngineError::NoPendingTurn);
        };
        let player = pending.player;
        let producer = match self.registry.as_ref().map(|registry| registry.resolve(player)) {
            Some(Ok(producer)) => producer,
            Some(Err(_)) | None => return Err(EngineError::UnknownPlayer { player }),
        };
        self.in_flight = Some(InFlight {
            player,
            observation: pending.observation,
            producer,
        });
        self.set_phase(EnginePhase::AwaitingAction);
        Ok(())
    }

    /// Ask `producer` for the in-flight turn's action.
    ///
    /// On failure the turn stays in flight so the caller can retry it.
    async fn produce(&mut self, producer: &dyn ActionProducer) -> Result<(PlayerId, Action)> {
        let Some(in_flight) = &self.in_flight else {
            return Err(EngineError::NoPendingTurn);
        };
        let player = in_flight.player;
        let turn = self.turn;

        producer
            .act(player, &in_flight.observation)
            .await
            .map(|action| (player, action))
            .map_err(|source| {
                warn!(%player, turn, error = %source, "producer failed");
                EngineError::Producer {
                    player,
                    turn,
                    source,
                }
            })
    }

    /// ApplyingStep → AwaitingObservation | Terminal.
    fn apply(
        &mut self,
        player: PlayerId,
        action: Action,
        sink: &dyn EventSink,
    ) -> Result<StepOutcome> {
        self.in_flight = None;
        self.set_phase(EnginePhase::ApplyingStep);
        sink.on_action(player, &action);

        let report = match self.session.step(&action) {
            Ok(report) => report,
            Err(err) => return Err(self.environment_fault(err, sink)),
        };
        sink.on_step_complete(report.done, &report.info);
        self.turn += 1;
        debug!(%player, turn = self.turn, done = report.done, "turn complete");

        if report.done {
            self.finish(GameStatus::Completed, sink)?;
            return self.finished_outcome();
        }
        if self.turn >= self.max_steps {
            self.finish(GameStatus::MaxStepsReached, sink)?;
            return self.finished_outcome();
        }

        self.set_phase(EnginePhase::AwaitingObservation);
        Ok(StepOutcome::Stepped {
            player,
            turn: self.turn,
        })
    }

    /// Enter `Terminal`: close the session once and memoize the result.
    fn finish(&mut self, status: GameStatus, sink: &dyn EventSink) -> Result<()> {
        let report = match self.close_once() {
            Some(Ok(report)) => report,
            Some(Err(err)) => return Err(self.environment_fault(err, sink)),
            None => FinalReport::default(),
        };

        let (human_players, automated_players) = self.players();
        let result = GameResult {
            status,
            steps: self.turn,
            rewards: report.rewards,
            info: report.info,
            human_players,
            automated_players,
        };
        info!(%status, steps = self.turn, "session finished");
        self.memoize(SessionOutcome::Finished(result), EnginePhase::Terminal, sink);
        Ok(())
    }

    fn environment_fault(&mut self, err: EnvironmentError, sink: &dyn EventSink) -> EngineError {
        error!(error = %err, operation = %err.operation(), "environment fault");
        let err = EngineError::Environment(err);
        self.fail(&err, sink);
        err
    }

    /// Enter `Failed`, attempting the cleanup `close()` if it has not run yet.
    fn fail(&mut self, err: &EngineError, sink: &dyn EventSink) {
        if self.phase.is_terminal() {
            return;
        }

        let (rewards, info) = match self.close_once() {
            Some(Ok(report)) => (Some(report.rewards), report.info),
            Some(Err(close_err)) => {
                warn!(error = %close_err, "cleanup close failed");
                (None, Info::new())
            }
            None => (None, Info::new()),
        };

        let (human_players, automated_players) = self.players();
        let failure = SessionFailure {
            reason: err.to_string(),
            error_code: err.error_code().to_owned(),
            steps: self.turn,
            rewards,
            info,
            human_players,
            automated_players,
        };
        self.in_flight = None;
        self.pending = None;
        self.memoize(SessionOutcome::Failed(failure), EnginePhase::Failed, sink);
    }

    fn close_once(&mut self) -> Option<std::result::Result<FinalReport, EnvironmentError>> {
        if self.close_attempted {
            return None;
        }
        self.close_attempted = true;
        Some(self.session.close())
    }

    fn memoize(&mut self, outcome: SessionOutcome, phase: EnginePhase, sink: &dyn EventSink) {
        if self.shared.outcome.set(outcome).is_err() {
            warn!("session outcome already recorded");
        }
        self.set_phase(phase);
        if let Some(outcome) = self.shared.outcome.get() {
            sink.on_finished(outcome);
        }
    }

    fn finished_outcome(&self) -> Result<StepOutcome> {
        self.shared
            .outcome
            .get()
            .map(|outcome| StepOutcome::Finished(outcome.clone()))
            .ok_or(EngineError::NotStarted)
    }

    fn players(&self) -> (Vec<PlayerId>, Vec<PlayerId>) {
        self.registry
            .as_ref()
            .map(|registry| {
                (
                    registry.interactive_players().to_vec(),
                    registry.automated_players().to_vec(),
                )
            })
            .unwrap_or_default()
    }
}
