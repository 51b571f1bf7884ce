//! Topic-based event bus implementation.
use std::collections::HashMap;

use arena_core::{Action, Info, Observation, PlayerId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::sink::EventSink;
use crate::engine::{PendingTurn, SessionOutcome};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Per-turn traffic (observations, actions, completed steps)
    Turn,
    /// Session lifecycle (suspensions, termination)
    Lifecycle,
}

/// Serializable copy of an engine notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    Observation {
        player: PlayerId,
        observation: Observation,
    },
    Action {
        player: PlayerId,
        action: Action,
    },
    StepComplete {
        done: bool,
        info: Info,
    },
    Suspended {
        pending: PendingTurn,
    },
    Finished {
        outcome: SessionOutcome,
    },
}

impl EngineEvent {
    pub fn topic(&self) -> Topic {
        match self {
            Self::Observation { .. } | Self::Action { .. } | Self::StepComplete { .. } => {
                Topic::Turn
            }
            Self::Suspended { .. } | Self::Finished { .. } => Topic::Lifecycle,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing is best-effort: with no subscribers the
/// event is dropped, and lagging subscribers lose the oldest events.
#[derive(Clone)]
pub struct EventBus {
    turn: broadcast::Sender<EngineEvent>,
    lifecycle: broadcast::Sender<EngineEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            turn: broadcast::channel(capacity).0,
            lifecycle: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<EngineEvent> {
        match topic {
            Topic::Turn => &self.turn,
            Topic::Lifecycle => &self.lifecycle,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: EngineEvent) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<EngineEvent> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<EngineEvent>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for EventBus {
    fn on_observation(&self, player: PlayerId, observation: &Observation) {
        self.publish(EngineEvent::Observation {
            player,
            observation: observation.clone(),
        });
    }

    fn on_action(&self, player: PlayerId, action: &Action) {
        self.publish(EngineEvent::Action {
            player,
            action: action.clone(),
        });
    }

    fn on_step_complete(&self, done: bool, info: &Info) {
        self.publish(EngineEvent::StepComplete {
            done,
            info: info.clone(),
        });
    }

    fn on_suspended(&self, pending: &PendingTurn) {
        self.publish(EngineEvent::Suspended {
            pending: pending.clone(),
        });
    }

    fn on_finished(&self, outcome: &SessionOutcome) {
        self.publish(EngineEvent::Finished {
            outcome: outcome.clone(),
        });
    }
}
