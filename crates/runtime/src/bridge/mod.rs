//! Hand-off between a task driving the engine and a foreground input source.
//!
//! A [`QueuedProducer`] is an interactive producer whose `act` parks on a
//! single-slot queue until the foreground side answers through
//! [`BridgeHandle`]. Each request carries its own one-shot reply slot, so the
//! foreground pushes exactly one action per pending turn and the engine never
//! issues a second request before the first one is answered.
//!
//! Closing or dropping the [`BridgeHandle`] poisons the bridge: a stalled
//! `act` call returns [`ProducerError::Disconnected`].
use arena_core::{Action, Observation, PlayerId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};

use crate::api::{ActionProducer, ProducerError};

/// Create a connected producer/handle pair.
pub fn channel() -> (QueuedProducer, BridgeHandle) {
    let (tx, rx) = mpsc::channel(1);
    (QueuedProducer { requests: tx }, BridgeHandle { requests: rx })
}

/// A request for one action, delivered to the foreground side.
#[derive(Debug)]
pub struct TurnRequest {
    player: PlayerId,
    observation: Observation,
    issued_at: DateTime<Utc>,
    reply: oneshot::Sender<Action>,
}

impl TurnRequest {
    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn observation(&self) -> &Observation {
        &self.observation
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Answer the request.
    ///
    /// Hands the action back if the waiting producer is gone.
    pub fn respond(self, action: impl Into<Action>) -> Result<(), Action> {
        self.reply.send(action.into())
    }
}

/// Interactive producer fed by a [`BridgeHandle`].
///
/// Clones share the same handle, so several human seats can be served by a
/// single foreground loop; each request names the player it is for.
#[derive(Debug, Clone)]
pub struct QueuedProducer {
    requests: mpsc::Sender<TurnRequest>,
}

#[async_trait]
impl ActionProducer for QueuedProducer {
    async fn act(
        &self,
        player: PlayerId,
        observation: &Observation,
    ) -> Result<Action, ProducerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let request = TurnRequest {
            player,
            observation: observation.clone(),
            issued_at: Utc::now(),
            reply: reply_tx,
        };

        self.requests
            .send(request)
            .await
            .map_err(|_| ProducerError::Disconnected)?;
        tracing::debug!(%player, "waiting for bridged action");

        reply_rx.await.map_err(|_| ProducerError::Disconnected)
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn label(&self) -> &str {
        "queued"
    }
}

/// Foreground end of the bridge.
#[derive(Debug)]
pub struct BridgeHandle {
    requests: mpsc::Receiver<TurnRequest>,
}

impl BridgeHandle {
    /// Wait for the next request.
    ///
    /// Returns `None` once every producer clone has been dropped.
    pub async fn next_request(&mut self) -> Option<TurnRequest> {
        self.requests.recv().await
    }

    /// Blocking variant for plain OS threads.
    ///
    /// Must not be called from within an async execution context.
    pub fn blocking_next_request(&mut self) -> Option<TurnRequest> {
        self.requests.blocking_recv()
    }

    /// Take a request if one is already waiting.
    pub fn try_next_request(&mut self) -> Option<TurnRequest> {
        self.requests.try_recv().ok()
    }

    /// Stop accepting requests; stalled and future `act` calls fail with
    /// [`ProducerError::Disconnected`].
    pub fn close(&mut self) {
        self.requests.close();
        while let Ok(request) = self.requests.try_recv() {
            drop(request);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn request_is_answered_through_handle() {
        let (producer, mut handle) = channel();
        let observation = Observation::new("your move");

        let waiter = tokio::spawn(async move { producer.act(PlayerId(1), &observation).await });

        let request = handle.next_request().await.unwrap();
        assert_eq!(request.player(), PlayerId(1));
        assert_eq!(request.observation().as_str(), "your move");
        request.respond("[cooperate]").unwrap();

        let action = waiter.await.unwrap().unwrap();
        assert_eq!(action.as_str(), "[cooperate]");
    }

    #[tokio::test]
    async fn closing_handle_disconnects_stalled_turn() {
        let (producer, mut handle) = channel();
        let waiter =
            tokio::spawn(async move { producer.act(PlayerId(0), &Observation::new("o")).await });

        // Let the producer enqueue its request before poisoning the bridge.
        tokio::task::yield_now().await;
        handle.close();

        assert!(matches!(
            waiter.await.unwrap(),
            Err(ProducerError::Disconnected)
        ));
    }

    #[tokio::test]
    async fn dropped_request_disconnects_producer() {
        let (producer, mut handle) = channel();
        let waiter =
            tokio::spawn(async move { producer.act(PlayerId(0), &Observation::new("o")).await });

        let request = handle.next_request().await.unwrap();
        drop(request);

        assert!(matches!(
            waiter.await.unwrap(),
            Err(ProducerError::Disconnected)
        ));
    }

    #[test]
    fn blocking_side_serves_a_background_runtime() {
        let (producer, mut handle) = channel();
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let waiter = runtime.spawn(async move {
            producer
                .act(PlayerId(4), &Observation::new("blocking"))
                .await
        });

        let request = handle.blocking_next_request().unwrap();
        assert_eq!(request.player(), PlayerId(4));
        request.respond("done").unwrap();

        let action = runtime.block_on(waiter).unwrap().unwrap();
        assert_eq!(action.as_str(), "done");
    }

    #[test]
    fn bridged_producer_is_interactive() {
        let (producer, _handle) = channel();
        assert!(producer.is_interactive());
        assert_eq!(producer.kind(), crate::api::ProducerKind::Interactive);
    }
}
