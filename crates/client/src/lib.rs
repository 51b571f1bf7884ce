//! Terminal driver for catalog games.
//!
//! The binary is the composition root: it reads [`ClientConfig`], installs
//! file logging, seats humans and bots around a [`Table`], and plays in one
//! of two modes:
//!
//! - [`PlayMode::Loop`]: the engine runs its own loop on a background task;
//!   human seats are served from stdin through the bridge.
//! - [`PlayMode::Step`]: the driver advances the engine itself and submits
//!   each human move when the engine suspends.

pub mod config;
pub mod logging;
pub mod play;
pub mod table;

pub use config::{ClientConfig, PlayMode};
pub use table::Table;
