//! Unified error types surfaced by the runtime API.
//!
//! Configuration, producer, submission and environment failures are kept
//! apart so embedding applications can apply the propagation policy they need:
//! configuration errors are never retried, producer errors only unwind the
//! turn in flight, and environment faults end the session.
use arena_core::{EnvironmentError, ErrorSeverity, GameError, PlayerId};
use thiserror::Error;

use crate::engine::EnginePhase;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Problems with the registry or with the engine's configuration state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("player id {id} is already registered")]
    DuplicateId { id: PlayerId },

    #[error("player id {id} is not registered")]
    UnknownPlayer { id: PlayerId },

    #[error("no player id is left after the highest registered one")]
    IdSpaceExhausted,

    #[error("no players registered")]
    EmptyRegistry,

    #[error("game requires {required} players but {actual} are registered")]
    PlayerCount { required: usize, actual: usize },

    #[error("engine has no validated player registry")]
    NotConfigured,

    #[error("engine is already configured")]
    AlreadyConfigured,
}

impl GameError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateId { .. } => "CONFIG_DUPLICATE_ID",
            Self::UnknownPlayer { .. } => "CONFIG_UNKNOWN_PLAYER",
            Self::IdSpaceExhausted => "CONFIG_ID_SPACE_EXHAUSTED",
            Self::EmptyRegistry => "CONFIG_EMPTY_REGISTRY",
            Self::PlayerCount { .. } => "CONFIG_PLAYER_COUNT",
            Self::NotConfigured => "CONFIG_NOT_CONFIGURED",
            Self::AlreadyConfigured => "CONFIG_ALREADY_CONFIGURED",
        }
    }
}

/// Failure raised by an [`ActionProducer`](crate::ActionProducer).
#[derive(Debug, Error)]
pub enum ProducerError {
    #[error("producer failed: {message}")]
    Failed { message: String },

    /// The external side of an interactive producer went away.
    #[error("producer input channel closed")]
    Disconnected,

    #[error("producer has no scripted actions left")]
    Exhausted,

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ProducerError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// Why a submission was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionRejection {
    #[error("engine is {phase}, no turn is suspended")]
    NotSuspended { phase: EnginePhase },

    #[error("the suspended turn belongs to {expected}")]
    WrongPlayer { expected: PlayerId },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The environment addressed a player the registry does not know.
    #[error("environment addressed unregistered player {player}")]
    UnknownPlayer { player: PlayerId },

    #[error("producer for {player} failed on turn {turn}")]
    Producer {
        player: PlayerId,
        turn: u32,
        #[source]
        source: ProducerError,
    },

    #[error("unexpected submission from {player}")]
    UnexpectedSubmission {
        player: PlayerId,
        #[source]
        reason: SubmissionRejection,
    },

    #[error(transparent)]
    Environment(#[from] EnvironmentError),

    #[error("session has not been started")]
    NotStarted,

    #[error("session has already been started")]
    AlreadyStarted,

    #[error("engine is applying a step")]
    Busy,

    #[error("no turn is awaiting an action")]
    NoPendingTurn,

    #[error("session already failed: {reason}")]
    SessionFailed { reason: String },
}

impl EngineError {
    pub(crate) fn unexpected(player: PlayerId, reason: SubmissionRejection) -> Self {
        Self::UnexpectedSubmission { player, reason }
    }
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Config(err) => err.severity(),
            Self::UnknownPlayer { .. } | Self::SessionFailed { .. } => ErrorSeverity::Fatal,
            Self::Environment(err) => err.severity(),
            Self::Producer { .. } | Self::UnexpectedSubmission { .. } | Self::Busy => {
                ErrorSeverity::Recoverable
            }
            Self::NotStarted | Self::AlreadyStarted | Self::NoPendingTurn => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(err) => err.error_code(),
            Self::UnknownPlayer { .. } => "ENGINE_UNKNOWN_PLAYER",
            Self::Producer { .. } => "ENGINE_PRODUCER",
            Self::UnexpectedSubmission { .. } => "ENGINE_UNEXPECTED_SUBMISSION",
            Self::Environment(err) => err.error_code(),
            Self::NotStarted => "ENGINE_NOT_STARTED",
            Self::AlreadyStarted => "ENGINE_ALREADY_STARTED",
            Self::Busy => "ENGINE_BUSY",
            Self::NoPendingTurn => "ENGINE_NO_PENDING_TURN",
            Self::SessionFailed { .. } => "ENGINE_SESSION_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::EnvOperation;

    #[test]
    fn severities_follow_propagation_policy() {
        let unknown = EngineError::UnknownPlayer {
            player: PlayerId(7),
        };
        assert!(unknown.severity().is_fatal());

        let submission = EngineError::unexpected(
            PlayerId(1),
            SubmissionRejection::WrongPlayer {
                expected: PlayerId(0),
            },
        );
        assert!(submission.severity().is_recoverable());
        assert_eq!(submission.error_code(), "ENGINE_UNEXPECTED_SUBMISSION");

        let env: EngineError = EnvironmentError::failed(EnvOperation::Close, "gone").into();
        assert!(env.severity().is_fatal());
        assert_eq!(env.error_code(), "ENV_FAILED");
    }

    #[test]
    fn config_errors_render_counts() {
        let err = ConfigError::PlayerCount {
            required: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "game requires 3 players but 2 are registered"
        );
        assert_eq!(err.error_code(), "CONFIG_PLAYER_COUNT");
    }
}
