//! Turn dispatch engine for multi-player, turn-based environments.
//!
//! The engine alternates between asking a [`GameSession`](arena_core::GameSession)
//! whose turn it is and asking that player's [`ActionProducer`] for an action.
//! Producers are either automated (answered in-line) or interactive (answered
//! by a human through [`TurnEngine::submit_action`] or a [`bridge`]).
//!
//! Modules are organized by responsibility:
//! - [`engine`] hosts the state machine, its builder and the session outcome types
//! - [`api`] exposes registries, producers and errors
//! - [`events`] fans engine notifications out to sinks, the bus and transcripts
//! - [`bridge`] connects a blocking input source to a running engine
pub mod api;
pub mod bridge;
pub mod engine;
pub mod events;

pub use api::{
    ActionProducer, ConfigError, EchoProducer, EngineError, FixedProducer, FnProducer,
    PlayerRegistry, ProducerError, ProducerKind, Result, Roster, ScriptedProducer,
    SubmissionRejection,
};
pub use bridge::{BridgeHandle, QueuedProducer, TurnRequest};
pub use engine::{
    EngineBuilder, EngineConfig, EnginePhase, EngineStatus, GameResult, GameStatus, PendingTurn,
    SessionFailure, SessionOutcome, StartInfo, StepOutcome, TurnEngine,
};
pub use events::{
    Callbacks, EngineEvent, EntryKind, EventBus, EventSink, LogSink, NoopSink, Topic, Transcript,
    TranscriptEntry,
};
