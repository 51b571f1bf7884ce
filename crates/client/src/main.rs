//! Arena client binary.
//!
//! # Examples
//!
//! ```bash
//! # One human against two bots in the three player prisoner's dilemma
//! cargo run -p arena-client
//!
//! # Colonel Blotto in step mode with a fixed seed
//! ARENA_GAME=colonel_blotto ARENA_MODE=step ARENA_SEED=7 cargo run -p arena-client
//! ```

use std::sync::Arc;

use anyhow::Result;
use arena_client::play::{play_loop, play_steps, summarize};
use arena_client::{ClientConfig, PlayMode, Table, logging};
use arena_runtime::Callbacks;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let log = logging::setup_logging(config.session_id.as_deref())?;
    for (key, value) in &config.ignored {
        tracing::warn!(key = *key, %value, "ignoring unparsable setting, using the default");
    }

    tracing::info!(
        game = %config.game,
        mode = %config.mode,
        seed = ?config.seed,
        "starting arena client"
    );

    let announcer = Callbacks::new().on_action(|player, action| {
        println!("{player} plays {action}");
    });
    let table = Table::assemble(&config, Arc::new(announcer))?;

    println!(
        "{} ({}) with {} human seat(s): {:?}",
        table.entry.name,
        table.entry.env_id,
        table.humans.len(),
        table.humans
    );
    println!("Logs: {}", log.log_file.display());

    let start = table.engine.start(config.seed).await?;
    println!("{}", start.initial_observation);

    let result = match config.mode {
        PlayMode::Loop => play_loop(table.engine, table.bridge, config.engine.max_steps).await?,
        PlayMode::Step => play_steps(table.engine).await?,
    };

    println!();
    println!("{}", summarize(&result));
    tracing::info!(session = %log.session_id, "arena client finished");
    Ok(())
}
