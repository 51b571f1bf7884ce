//! The two ways of driving a table from the terminal.
use std::io::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arena_core::{Observation, PlayerId};
use arena_runtime::{BridgeHandle, GameResult, NoopSink, SessionOutcome, StepOutcome, TurnEngine};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

type Input = Lines<BufReader<Stdin>>;

fn stdin_lines() -> Input {
    BufReader::new(tokio::io::stdin()).lines()
}

fn prompt(player: PlayerId, observation: &Observation) {
    println!();
    println!("── {player} to move ──");
    println!("{observation}");
    print!("> ");
    let _ = std::io::stdout().flush();
}

/// Let the engine run its own loop while this task answers bridged requests.
///
/// End of input closes the bridge, which aborts the session on the stalled
/// human turn.
pub async fn play_loop(
    engine: Arc<TurnEngine>,
    bridge: Option<BridgeHandle>,
    max_steps: u32,
) -> Result<GameResult> {
    let mut driver = tokio::spawn({
        let engine = Arc::clone(&engine);
        async move { engine.run(max_steps, &NoopSink).await }
    });

    let Some(mut bridge) = bridge else {
        return Ok(driver.await.context("engine task panicked")??);
    };
    let mut input = stdin_lines();

    loop {
        tokio::select! {
            joined = &mut driver => {
                return Ok(joined.context("engine task panicked")??);
            }
            request = bridge.next_request() => {
                let Some(request) = request else {
                    return Ok(driver.await.context("engine task panicked")??);
                };
                prompt(request.player(), request.observation());

                match input.next_line().await? {
                    Some(line) => {
                        if request.respond(line).is_err() {
                            tracing::warn!("engine stopped waiting before the move arrived");
                        }
                    }
                    None => {
                        tracing::info!("input closed, abandoning the game");
                        bridge.close();
                        drop(request);
                    }
                }
            }
        }
    }
}

/// Advance the engine turn by turn, submitting human moves directly.
pub async fn play_steps(engine: Arc<TurnEngine>) -> Result<GameResult> {
    let mut input = stdin_lines();

    loop {
        match engine.advance_until_blocked().await? {
            StepOutcome::Suspended(pending) => {
                prompt(pending.player, &pending.observation);
                let Some(line) = input.next_line().await? else {
                    bail!("input closed while {} was to move", pending.player);
                };
                engine.submit_action(pending.player, line).await?;
            }
            StepOutcome::Finished(SessionOutcome::Finished(result)) => return Ok(result),
            StepOutcome::Finished(SessionOutcome::Failed(failure)) => {
                bail!("game aborted after {} steps: {}", failure.steps, failure.reason);
            }
            StepOutcome::Stepped { .. } => {}
        }
    }
}

/// Final standings, marking each winner as human or automated.
pub fn summarize(result: &GameResult) -> String {
    let mut lines = vec![format!(
        "Game over ({}) after {} steps.",
        result.status, result.steps
    )];
    for (player, reward) in &result.rewards {
        lines.push(format!("  {player}: {reward}"));
    }

    let winners: Vec<String> = result
        .winners()
        .into_iter()
        .map(|player| {
            let kind = if result.is_human(player) {
                "human"
            } else {
                "automated"
            };
            format!("{player} ({kind})")
        })
        .collect();
    if winners.is_empty() {
        lines.push("No rewards were reported.".to_owned());
    } else {
        lines.push(format!("Winner: {}", winners.join(", ")));
    }
    lines.join("\n")
}
