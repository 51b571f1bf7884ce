//! Client configuration structures and loaders.
use std::env;

use arena_runtime::EngineConfig;

/// How the driver feeds human moves into the engine.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PlayMode {
    /// The engine runs its own loop; humans answer through the bridge.
    #[default]
    Loop,
    /// The driver advances the engine and submits human moves itself.
    Step,
}

/// Configuration required to set up one game at the terminal.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub game: String,
    pub human_players: usize,
    pub seed: Option<u64>,
    pub mode: PlayMode,
    pub session_id: Option<String>,
    pub engine: EngineConfig,
    /// `(variable, value)` pairs that failed to parse and were replaced by
    /// defaults. Loading runs before logging is installed, so the caller
    /// reports these.
    pub ignored: Vec<(&'static str, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            game: "three_player_ipd".to_owned(),
            human_players: 1,
            seed: None,
            mode: PlayMode::default(),
            session_id: None,
            engine: EngineConfig::default(),
            ignored: Vec::new(),
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_GAME` - Short name or environment id (default: three_player_ipd)
    /// - `ARENA_HUMAN_PLAYERS` - Human seats, clamped to the game (default: 1)
    /// - `ARENA_SEED` - Seed for the environment and bots (default: random)
    /// - `ARENA_MODE` - `loop` or `step` (default: loop)
    /// - `ARENA_SESSION_ID` - Log session name (default: auto-generated)
    /// - `ARENA_MAX_STEPS`, `ARENA_EVENT_BUFFER` - See [`EngineConfig::from_env`]
    pub fn from_env() -> Self {
        let mut config = Self::from_vars(|key| env::var(key).ok());
        config.engine = EngineConfig::from_env();
        config
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary lookup, without
    /// the engine section.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(game) = read("ARENA_GAME") {
            config.game = game.trim().to_owned();
        }

        if let Some(humans) = read("ARENA_HUMAN_PLAYERS") {
            match humans.trim().parse() {
                Ok(humans) => config.human_players = humans,
                Err(_) => config.ignored.push(("ARENA_HUMAN_PLAYERS", humans)),
            }
        }

        if let Some(seed) = read("ARENA_SEED") {
            match seed.trim().parse() {
                Ok(seed) => config.seed = Some(seed),
                Err(_) => config.ignored.push(("ARENA_SEED", seed)),
            }
        }

        if let Some(mode) = read("ARENA_MODE") {
            match mode.trim().parse() {
                Ok(mode) => config.mode = mode,
                Err(_) => config.ignored.push(("ARENA_MODE", mode)),
            }
        }

        config.session_id = read("ARENA_SESSION_ID");

        config
    }

    /// Human seats for a game that needs `required` players.
    pub fn human_seats(&self, required: usize) -> usize {
        self.human_players.min(required)
    }
}
