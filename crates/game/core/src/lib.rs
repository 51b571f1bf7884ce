//! Shared types for turn-based arenas.
//!
//! `arena-core` defines the identifiers and opaque payloads that flow between
//! environments and action producers, and the [`GameSession`] contract the
//! runtime drives. It contains no scheduling logic of its own.
pub mod error;
pub mod payload;
pub mod player;
pub mod session;

pub use error::{EnvOperation, EnvironmentError, ErrorSeverity, GameError};
pub use payload::{Action, Observation};
pub use player::PlayerId;
pub use session::{FinalReport, GameSession, Info, Rewards, StepReport};
