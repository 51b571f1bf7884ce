//! Automated policies for the demo games.
use std::sync::Mutex;

use arena_core::{Action, Observation, PlayerId};
use arena_runtime::{ActionProducer, ProducerError};
use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::catalog::GameKind;

/// Picks uniformly among a fixed set of moves, ignoring the observation.
#[derive(Debug)]
pub struct RandomChoiceProducer {
    choices: Vec<Action>,
    rng: Mutex<StdRng>,
}

impl RandomChoiceProducer {
    pub fn new<I, A>(choices: I, seed: Option<u64>) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Action>,
    {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
            rng: Mutex::new(rng),
        }
    }

    /// Policy over the sample moves of `game`.
    pub fn for_game(game: GameKind, seed: Option<u64>) -> Self {
        Self::new(game.sample_actions().iter().copied(), seed)
    }
}

#[async_trait]
impl ActionProducer for RandomChoiceProducer {
    async fn act(
        &self,
        _player: PlayerId,
        _observation: &Observation,
    ) -> Result<Action, ProducerError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| ProducerError::failed("random source poisoned"))?;
        self.choices
            .choose(&mut *rng)
            .cloned()
            .ok_or_else(|| ProducerError::failed("no moves to choose from"))
    }

    fn label(&self) -> &str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn picks_from_the_given_moves() {
        let producer = RandomChoiceProducer::for_game(GameKind::Countdown, Some(5));
        let observation = Observation::new("counter at 9");

        for _ in 0..20 {
            let action = producer.act(PlayerId(1), &observation).await.unwrap();
            assert!(GameKind::Countdown.sample_actions().contains(&action.as_str()));
        }
        assert!(!producer.is_interactive());
    }

    #[tokio::test]
    async fn same_seed_same_moves() {
        let a = RandomChoiceProducer::for_game(GameKind::ColonelBlotto, Some(11));
        let b = RandomChoiceProducer::for_game(GameKind::ColonelBlotto, Some(11));
        let observation = Observation::new("round 1");

        for _ in 0..5 {
            assert_eq!(
                a.act(PlayerId(0), &observation).await.unwrap(),
                b.act(PlayerId(0), &observation).await.unwrap()
            );
        }
    }

    #[tokio::test]
    async fn empty_policy_fails() {
        let producer = RandomChoiceProducer::new(Vec::<Action>::new(), None);
        let err = producer
            .act(PlayerId(0), &Observation::new("anything"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProducerError::Failed { .. }));
    }
}
