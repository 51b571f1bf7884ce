//! Supported games and how to build them.
//!
//! Every game is reachable by a short name (`three_player_ipd`) and by its
//! canonical environment id (`ThreePlayerIPD-v0`).
use arena_core::GameSession;
use strum::IntoEnumIterator;
use thiserror::Error;

use crate::games::{
    CODENAMES_WORDS, Codenames, ColonelBlotto, Countdown, SecretMafia, ThreePlayerIpd,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unsupported game: {name}. Supported games: {}", .supported.join(", "))]
    UnsupportedGame {
        name: String,
        supported: Vec<&'static str>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum GameKind {
    SecretMafia,
    ThreePlayerIpd,
    ColonelBlotto,
    Codenames,
    Countdown,
}

impl GameKind {
    pub fn short_name(self) -> &'static str {
        match self {
            Self::SecretMafia => "secret_mafia",
            Self::ThreePlayerIpd => "three_player_ipd",
            Self::ColonelBlotto => "colonel_blotto",
            Self::Codenames => "codenames",
            Self::Countdown => "countdown",
        }
    }

    pub fn env_id(self) -> &'static str {
        match self {
            Self::SecretMafia => "SecretMafia-v0",
            Self::ThreePlayerIpd => "ThreePlayerIPD-v0",
            Self::ColonelBlotto => "ColonelBlotto-v0",
            Self::Codenames => "Codenames-v0",
            Self::Countdown => "Countdown-v0",
        }
    }

    pub fn required_players(self) -> usize {
        match self {
            Self::SecretMafia => 7,
            Self::ThreePlayerIpd => 3,
            Self::ColonelBlotto | Self::Countdown => 2,
            Self::Codenames => 4,
        }
    }

    /// Well-formed moves, used to seed automated policies.
    pub fn sample_actions(self) -> &'static [&'static str] {
        match self {
            Self::SecretMafia => &["[0]", "[1]", "[2]", "[3]", "[4]", "[5]", "[6]"],
            Self::ThreePlayerIpd => &["[cooperate]", "[defect]"],
            Self::ColonelBlotto => &[
                "[A7 B7 C6]",
                "[A10 B10 C0]",
                "[A0 B10 C10]",
                "[A10 B0 C10]",
                "[A4 B8 C8]",
            ],
            // Bare board words double as clues and guesses.
            Self::Codenames => &CODENAMES_WORDS,
            Self::Countdown => &["[1]", "[2]", "[3]"],
        }
    }

    pub fn create(self) -> Box<dyn GameSession> {
        match self {
            Self::SecretMafia => Box::new(SecretMafia::default()),
            Self::ThreePlayerIpd => Box::new(ThreePlayerIpd::default()),
            Self::ColonelBlotto => Box::new(ColonelBlotto::default()),
            Self::Codenames => Box::new(Codenames::default()),
            Self::Countdown => Box::new(Countdown::default()),
        }
    }
}

/// Resolved catalog row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    pub kind: GameKind,
    pub name: &'static str,
    pub env_id: &'static str,
    pub required_players: usize,
}

impl From<GameKind> for CatalogEntry {
    fn from(kind: GameKind) -> Self {
        Self {
            kind,
            name: kind.short_name(),
            env_id: kind.env_id(),
            required_players: kind.required_players(),
        }
    }
}

/// Lookup table over the built-in games.
#[derive(Debug, Clone)]
pub struct GameCatalog {
    entries: Vec<CatalogEntry>,
}

impl Default for GameCatalog {
    fn default() -> Self {
        Self {
            entries: GameKind::iter().map(CatalogEntry::from).collect(),
        }
    }
}

impl GameCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts a short name or an environment id.
    pub fn resolve(&self, name: &str) -> Result<CatalogEntry, CatalogError> {
        self.entries
            .iter()
            .find(|entry| entry.name == name || entry.env_id == name)
            .copied()
            .ok_or_else(|| CatalogError::UnsupportedGame {
                name: name.to_owned(),
                supported: self.list(),
            })
    }

    /// Short names of every supported game.
    pub fn list(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.name).collect()
    }

    pub fn required_players(&self, name: &str) -> Result<usize, CatalogError> {
        self.resolve(name).map(|entry| entry.required_players)
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn GameSession>, CatalogError> {
        let entry = self.resolve(name)?;
        tracing::debug!(game = entry.name, env_id = entry.env_id, "creating environment");
        Ok(entry.kind.create())
    }
}
