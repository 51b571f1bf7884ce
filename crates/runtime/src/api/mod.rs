//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! the engine module can stay focused on turn orchestration.

pub mod errors;
pub mod producers;
pub mod registry;

pub use errors::{ConfigError, EngineError, ProducerError, Result, SubmissionRejection};
pub use producers::{
    ActionProducer, EchoProducer, FixedProducer, FnProducer, ProducerKind, ScriptedProducer,
};
pub use registry::{PlayerRegistry, Roster};
