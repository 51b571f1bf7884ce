mod common;

use std::sync::Arc;

use arena_core::PlayerId;
use arena_runtime::{
    EchoProducer, EngineError, GameStatus, NoopSink, PlayerRegistry, ProducerError, StepOutcome,
    TurnEngine, bridge,
};
use common::RoundRobin;

#[tokio::test]
async fn blocking_loop_is_fed_through_the_bridge() {
    let (env, probe) = RoundRobin::new(4);
    let (human, mut handle) = bridge::channel();
    let mut registry = PlayerRegistry::new();
    registry.register(human, Some(PlayerId(0))).unwrap();
    registry.register(EchoProducer, Some(PlayerId(1))).unwrap();

    let engine = Arc::new(TurnEngine::builder(env).players(registry, 2).build().unwrap());
    engine.start(None).await.unwrap();

    let driver = tokio::spawn({
        let engine = Arc::clone(&engine);
        async move { engine.run(10, &NoopSink).await }
    });

    let mut answered = Vec::new();
    while let Some(request) = handle.next_request().await {
        answered.push(request.observation().as_str().to_owned());
        let reply = format!("move {}", answered.len());
        request.respond(reply).unwrap();
        if answered.len() == 2 {
            break;
        }
    }

    let result = driver.await.unwrap().unwrap();
    assert_eq!(result.status, GameStatus::Completed);
    assert_eq!(result.human_players, vec![PlayerId(0)]);
    assert_eq!(answered, vec!["step 0", "step 2"]);
    assert_eq!(probe.actions()[2], (PlayerId(0), "move 2".to_owned()));
}

#[tokio::test]
async fn bridged_seat_suspends_in_step_mode() {
    let (env, _probe) = RoundRobin::new(4);
    let (human, mut handle) = bridge::channel();
    let mut registry = PlayerRegistry::new();
    registry.register(human, None).unwrap();
    registry.register(EchoProducer, None).unwrap();

    let engine = TurnEngine::builder(env).players(registry, 2).build().unwrap();
    engine.start(None).await.unwrap();

    assert!(matches!(
        engine.advance().await.unwrap(),
        StepOutcome::Suspended(_)
    ));
    // Step mode answers through submit_action; the queue stays untouched.
    assert!(handle.try_next_request().is_none());
}

#[tokio::test]
async fn closed_bridge_surfaces_as_producer_error() {
    let (env, probe) = RoundRobin::new(4);
    let (human, mut handle) = bridge::channel();
    let mut registry = PlayerRegistry::new();
    registry.register(human, None).unwrap();
    registry.register(EchoProducer, None).unwrap();

    let engine = TurnEngine::builder(env).players(registry, 2).build().unwrap();
    engine.start(None).await.unwrap();
    handle.close();

    let err = engine.run(10, &NoopSink).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::Producer {
            source: ProducerError::Disconnected,
            ..
        }
    ));
    assert_eq!(probe.closes(), 0);
}
