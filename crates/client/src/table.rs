//! Seats players around a catalog game.
use std::sync::Arc;

use anyhow::{Context, Result};
use arena_core::PlayerId;
use arena_games::{CatalogEntry, GameCatalog, RandomChoiceProducer};
use arena_runtime::{BridgeHandle, EventSink, LogSink, PlayerRegistry, TurnEngine, bridge};

use crate::config::ClientConfig;

/// A configured engine plus the foreground end of its human seats.
pub struct Table {
    pub engine: Arc<TurnEngine>,
    pub entry: CatalogEntry,
    pub humans: Vec<PlayerId>,
    /// Present when at least one seat is human.
    pub bridge: Option<BridgeHandle>,
}

impl Table {
    /// Build the game named in `config`, with humans in the lowest seats and
    /// random bots in the rest.
    pub fn assemble(config: &ClientConfig, sink: Arc<dyn EventSink>) -> Result<Self> {
        let catalog = GameCatalog::new();
        let entry = catalog.resolve(&config.game)?;
        let session = catalog.create(entry.name)?;

        let required = entry.required_players;
        let human_seats = config.human_seats(required);
        if human_seats < config.human_players {
            tracing::warn!(
                requested = config.human_players,
                seats = human_seats,
                game = entry.name,
                "more humans requested than seats available"
            );
        }

        let mut registry = PlayerRegistry::new();
        let mut humans = Vec::with_capacity(human_seats);
        let bridge = if human_seats > 0 {
            let (producer, handle) = bridge::channel();
            for _ in 0..human_seats {
                humans.push(registry.register(producer.clone(), None)?);
            }
            Some(handle)
        } else {
            None
        };

        for seat in human_seats..required {
            let seed = config.seed.map(|seed| seed.wrapping_add(seat as u64 + 1));
            registry.register(RandomChoiceProducer::for_game(entry.kind, seed), None)?;
        }

        let engine = TurnEngine::builder(session)
            .config(config.engine.clone())
            .sink(LogSink)
            .shared_sink(sink)
            .players(registry, required)
            .build()
            .with_context(|| format!("failed to seat players for {}", entry.name))?;

        tracing::info!(
            game = entry.name,
            humans = humans.len(),
            bots = required - humans.len(),
            "table assembled"
        );

        Ok(Self {
            engine: Arc::new(engine),
            entry,
            humans,
            bridge,
        })
    }
}
