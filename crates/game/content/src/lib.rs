//! Playable demo environments for the turn engine.
//!
//! This crate houses a small set of text games implementing
//! [`GameSession`](arena_core::GameSession) and the catalog that maps their
//! names to factories:
//! - [`SecretMafia`]: hidden-role elimination for seven players
//! - [`ThreePlayerIpd`]: iterated prisoner's dilemma between three players
//! - [`ColonelBlotto`]: two generals splitting troops over three fields
//! - [`Codenames`]: two teams of spymaster and guesser
//! - [`Countdown`]: take-away game on a shared counter
//!
//! Rules are deliberately small; the games exist to exercise the engine with
//! real observations, turn orders and rewards.

pub mod catalog;
pub mod games;
pub mod policy;

pub use catalog::{CatalogEntry, CatalogError, GameCatalog, GameKind};
pub use games::{Codenames, ColonelBlotto, Countdown, SecretMafia, ThreePlayerIpd};
pub use policy::RandomChoiceProducer;
