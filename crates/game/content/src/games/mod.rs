//! Demo environments.
//!
//! Moves are written in square brackets (`[defect]`, `[A7 B7 C6]`, `[2]`);
//! text outside the brackets is ignored so chatty players still parse.
mod blotto;
mod codenames;
mod countdown;
mod ipd;
mod mafia;

pub use blotto::ColonelBlotto;
pub use codenames::Codenames;
pub use countdown::Countdown;
pub use ipd::ThreePlayerIpd;
pub use mafia::SecretMafia;

pub(crate) use codenames::WORDS as CODENAMES_WORDS;

use arena_core::{EnvOperation, EnvironmentError};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Content of the last `[...]` group, or the whole trimmed text.
fn bracketed(text: &str) -> &str {
    match (text.rfind('['), text.rfind(']')) {
        (Some(open), Some(close)) if open < close => text[open + 1..close].trim(),
        _ => text.trim(),
    }
}

fn not_started(operation: EnvOperation) -> EnvironmentError {
    EnvironmentError::out_of_order(operation, "reset has not been called")
}

fn already_over(operation: EnvOperation) -> EnvironmentError {
    EnvironmentError::out_of_order(operation, "game is already over")
}
