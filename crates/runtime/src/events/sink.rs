//! Outbound notification channel for engine lifecycle events.
//!
//! Sinks are observers: the engine ignores whatever they do and never reads
//! anything back. A panicking sink is logged and skipped. Every method has a
//! no-op default so a sink implements only the notifications it cares about.
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use arena_core::{Action, Info, Observation, PlayerId};

use crate::engine::{PendingTurn, SessionOutcome};

pub trait EventSink: Send + Sync {
    fn on_observation(&self, _player: PlayerId, _observation: &Observation) {}

    fn on_action(&self, _player: PlayerId, _action: &Action) {}

    fn on_step_complete(&self, _done: bool, _info: &Info) {}

    fn on_suspended(&self, _pending: &PendingTurn) {}

    fn on_finished(&self, _outcome: &SessionOutcome) {}
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {}

/// Forwards notifications to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn on_observation(&self, player: PlayerId, observation: &Observation) {
        tracing::debug!(%player, observation = %observation.preview(200), "observation");
    }

    fn on_action(&self, player: PlayerId, action: &Action) {
        tracing::debug!(%player, %action, "action");
    }

    fn on_step_complete(&self, done: bool, info: &Info) {
        tracing::trace!(done, ?info, "step complete");
    }

    fn on_suspended(&self, pending: &PendingTurn) {
        tracing::info!(player = %pending.player, turn = pending.turn, "waiting for input");
    }

    fn on_finished(&self, outcome: &SessionOutcome) {
        match outcome {
            SessionOutcome::Finished(result) => {
                tracing::info!(status = %result.status, steps = result.steps, "game over");
            }
            SessionOutcome::Failed(failure) => {
                tracing::warn!(reason = %failure.reason, steps = failure.steps, "game aborted");
            }
        }
    }
}

type ObservationFn = Box<dyn Fn(PlayerId, &Observation) + Send + Sync>;
type ActionFn = Box<dyn Fn(PlayerId, &Action) + Send + Sync>;
type StepFn = Box<dyn Fn(bool, &Info) + Send + Sync>;
type SuspendedFn = Box<dyn Fn(&PendingTurn) + Send + Sync>;
type FinishedFn = Box<dyn Fn(&SessionOutcome) + Send + Sync>;

/// Closure-backed sink; unset callbacks are skipped.
///
/// ```ignore
/// let sink = Callbacks::new()
///     .on_observation(|player, obs| println!("{player} sees {obs}"))
///     .on_action(|player, action| println!("{player} plays {action}"));
/// ```
#[derive(Default)]
pub struct Callbacks {
    observation: Option<ObservationFn>,
    action: Option<ActionFn>,
    step_complete: Option<StepFn>,
    suspended: Option<SuspendedFn>,
    finished: Option<FinishedFn>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_observation(
        mut self,
        f: impl Fn(PlayerId, &Observation) + Send + Sync + 'static,
    ) -> Self {
        self.observation = Some(Box::new(f));
        self
    }

    pub fn on_action(mut self, f: impl Fn(PlayerId, &Action) + Send + Sync + 'static) -> Self {
        self.action = Some(Box::new(f));
        self
    }

    pub fn on_step_complete(mut self, f: impl Fn(bool, &Info) + Send + Sync + 'static) -> Self {
        self.step_complete = Some(Box::new(f));
        self
    }

    pub fn on_suspended(mut self, f: impl Fn(&PendingTurn) + Send + Sync + 'static) -> Self {
        self.suspended = Some(Box::new(f));
        self
    }

    pub fn on_finished(mut self, f: impl Fn(&SessionOutcome) + Send + Sync + 'static) -> Self {
        self.finished = Some(Box::new(f));
        self
    }
}

impl EventSink for Callbacks {
    fn on_observation(&self, player: PlayerId, observation: &Observation) {
        if let Some(f) = &self.observation {
            f(player, observation);
        }
    }

    fn on_action(&self, player: PlayerId, action: &Action) {
        if let Some(f) = &self.action {
            f(player, action);
        }
    }

    fn on_step_complete(&self, done: bool, info: &Info) {
        if let Some(f) = &self.step_complete {
            f(done, info);
        }
    }

    fn on_suspended(&self, pending: &PendingTurn) {
        if let Some(f) = &self.suspended {
            f(pending);
        }
    }

    fn on_finished(&self, outcome: &SessionOutcome) {
        if let Some(f) = &self.finished {
            f(outcome);
        }
    }
}

/// Delivers each notification to the engine's sinks, then to a per-call sink.
pub(crate) struct Fanout<'a> {
    sinks: &'a [Arc<dyn EventSink>],
    extra: Option<&'a dyn EventSink>,
}

impl<'a> Fanout<'a> {
    pub(crate) fn new(sinks: &'a [Arc<dyn EventSink>], extra: Option<&'a dyn EventSink>) -> Self {
        Self { sinks, extra }
    }

    fn each(&self, event: &'static str, f: impl Fn(&dyn EventSink)) {
        let deliver = |sink: &dyn EventSink| {
            if panic::catch_unwind(AssertUnwindSafe(|| f(sink))).is_err() {
                tracing::warn!(event, "event sink panicked, notification dropped");
            }
        };
        for sink in self.sinks {
            deliver(sink.as_ref());
        }
        if let Some(extra) = self.extra {
            deliver(extra);
        }
    }
}

impl EventSink for Fanout<'_> {
    fn on_observation(&self, player: PlayerId, observation: &Observation) {
        self.each("observation", |sink| sink.on_observation(player, observation));
    }

    fn on_action(&self, player: PlayerId, action: &Action) {
        self.each("action", |sink| sink.on_action(player, action));
    }

    fn on_step_complete(&self, done: bool, info: &Info) {
        self.each("step_complete", |sink| sink.on_step_complete(done, info));
    }

    fn on_suspended(&self, pending: &PendingTurn) {
        self.each("suspended", |sink| sink.on_suspended(pending));
    }

    fn on_finished(&self, outcome: &SessionOutcome) {
        self.each("finished", |sink| sink.on_finished(outcome));
    }
}
