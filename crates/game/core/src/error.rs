//! Common error infrastructure shared by every arena crate.
//!
//! Crates define their own `thiserror` enums and classify them through
//! [`GameError`], so callers can decide between retrying, rejecting input, or
//! abandoning the session without matching every variant.
//!
//! # Design Principles
//!
//! - **Severity Classification**: Errors are categorized for recovery strategies
//! - **Stable Codes**: Every variant maps to a `SCREAMING_SNAKE` code for logs and tests
//! - **Opaque Environments**: Environment failures carry a message, never a foreign error type

/// Severity level of an error, used for categorization and recovery strategies.
///
/// Errors are classified by their recoverability and expected handling:
/// - **Recoverable**: The same call may succeed later or with a different input
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected state inconsistencies that require investigation
/// - **Fatal**: The session cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative input.
    ///
    /// Examples: a submission raced with another one, a producer call failed
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: duplicate player id, wrong player count
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - the session is over.
    ///
    /// Examples: environment addressed an unknown player, environment step raised
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if the session cannot continue after this error.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Common trait for all arena errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Environment entry point that raised an [`EnvironmentError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EnvOperation {
    Reset,
    GetObservation,
    Step,
    Close,
}

/// Failure raised by a [`GameSession`](crate::GameSession) implementation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnvironmentError {
    /// The environment was driven in an order it does not support.
    #[error("environment {operation} called out of order: {message}")]
    OutOfOrder {
        operation: EnvOperation,
        message: String,
    },

    /// The environment rejected or failed to process the call.
    #[error("environment {operation} failed: {message}")]
    Failed {
        operation: EnvOperation,
        message: String,
    },
}

impl EnvironmentError {
    pub fn failed(operation: EnvOperation, message: impl Into<String>) -> Self {
        Self::Failed {
            operation,
            message: message.into(),
        }
    }

    pub fn out_of_order(operation: EnvOperation, message: impl Into<String>) -> Self {
        Self::OutOfOrder {
            operation,
            message: message.into(),
        }
    }

    /// Entry point that raised this error.
    pub fn operation(&self) -> EnvOperation {
        match self {
            Self::OutOfOrder { operation, .. } | Self::Failed { operation, .. } => *operation,
        }
    }
}

impl GameError for EnvironmentError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::OutOfOrder { .. } => ErrorSeverity::Internal,
            Self::Failed { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::OutOfOrder { .. } => "ENV_OUT_OF_ORDER",
            Self::Failed { .. } => "ENV_FAILED",
        }
    }
}
