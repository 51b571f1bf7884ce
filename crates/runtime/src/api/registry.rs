//! Player registry mapping seats to action producers.
//!
//! The [`PlayerRegistry`] owns every producer of a session exclusively and is
//! write-once per slot: ids are never removed or rebound.
//!
//! # Design
//!
//! ```text
//! PlayerRegistry
//! ├── producers: BTreeMap<PlayerId, Producer>  (one producer per seat)
//! ├── interactive: Vec<PlayerId>  (registration order, reporting only)
//! └── automated: Vec<PlayerId>    (registration order, reporting only)
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use arena_core::PlayerId;
use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::producers::{ActionProducer, ProducerKind};

/// Summary of the seats in a registry, grouped by capability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub human_players: Vec<PlayerId>,
    pub automated_players: Vec<PlayerId>,
    pub total: Vec<PlayerId>,
}

#[derive(Default)]
pub struct PlayerRegistry {
    /// Cloned out per turn; the registry is never borrowed across an await.
    producers: BTreeMap<PlayerId, Arc<dyn ActionProducer>>,
    interactive: Vec<PlayerId>,
    automated: Vec<PlayerId>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a producer under `id`, or under the next free id when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateId`] if `id` is already taken, or
    /// [`ConfigError::IdSpaceExhausted`] if no id follows the current maximum.
    pub fn register(
        &mut self,
        producer: impl ActionProducer + 'static,
        id: Option<PlayerId>,
    ) -> Result<PlayerId, ConfigError> {
        self.insert(Arc::new(producer), id)
    }

    /// Register a boxed producer.
    ///
    /// This is useful when you already have a `Box<dyn ActionProducer>`.
    pub fn register_boxed(
        &mut self,
        producer: Box<dyn ActionProducer>,
        id: Option<PlayerId>,
    ) -> Result<PlayerId, ConfigError> {
        self.insert(Arc::from(producer), id)
    }

    fn insert(
        &mut self,
        producer: Arc<dyn ActionProducer>,
        id: Option<PlayerId>,
    ) -> Result<PlayerId, ConfigError> {
        let id = match id {
            Some(id) => id,
            None => self
                .next_available_id()
                .ok_or(ConfigError::IdSpaceExhausted)?,
        };
        if self.producers.contains_key(&id) {
            return Err(ConfigError::DuplicateId { id });
        }

        let kind = producer.kind();
        match kind {
            ProducerKind::Interactive => self.interactive.push(id),
            ProducerKind::Automated => self.automated.push(id),
        }
        tracing::info!(player = %id, %kind, label = producer.label(), "registered player");

        self.producers.insert(id, producer);
        Ok(id)
    }

    /// `max(existing ids) + 1`, or the first id for an empty registry.
    ///
    /// `None` once the maximum id is taken.
    pub fn next_available_id(&self) -> Option<PlayerId> {
        match self.producers.keys().next_back() {
            Some(last) => last.next(),
            None => Some(PlayerId::FIRST),
        }
    }

    /// True iff exactly `required` players are registered.
    pub fn validate_count(&self, required: usize) -> bool {
        self.producers.len() == required
    }

    /// Get the producer bound to `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPlayer`] if nothing is registered under `id`.
    pub fn resolve(&self, id: PlayerId) -> Result<Arc<dyn ActionProducer>, ConfigError> {
        self.producers
            .get(&id)
            .cloned()
            .ok_or(ConfigError::UnknownPlayer { id })
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.producers.contains_key(&id)
    }

    pub fn kind_of(&self, id: PlayerId) -> Option<ProducerKind> {
        self.producers.get(&id).map(|producer| producer.kind())
    }

    pub fn len(&self) -> usize {
        self.producers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }

    /// All registered ids in ascending order.
    pub fn ids(&self) -> Vec<PlayerId> {
        self.producers.keys().copied().collect()
    }

    /// Interactive seats in registration order.
    pub fn interactive_players(&self) -> &[PlayerId] {
        &self.interactive
    }

    /// Automated seats in registration order.
    pub fn automated_players(&self) -> &[PlayerId] {
        &self.automated
    }

    pub fn roster(&self) -> Roster {
        Roster {
            human_players: self.interactive.clone(),
            automated_players: self.automated.clone(),
            total: self.ids(),
        }
    }
}

impl std::fmt::Debug for PlayerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerRegistry")
            .field("interactive", &self.interactive)
            .field("automated", &self.automated)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::producers::{EchoProducer, FixedProducer};
    use crate::bridge;

    #[test]
    fn ids_are_assigned_after_the_current_maximum() {
        let mut registry = PlayerRegistry::new();
        assert_eq!(registry.register(EchoProducer, None).unwrap(), PlayerId(0));
        assert_eq!(registry.register(EchoProducer, None).unwrap(), PlayerId(1));
        assert_eq!(
            registry.register(EchoProducer, Some(PlayerId(5))).unwrap(),
            PlayerId(5)
        );
        assert_eq!(registry.register(EchoProducer, None).unwrap(), PlayerId(6));
        assert_eq!(
            registry.register(EchoProducer, Some(PlayerId(3))).unwrap(),
            PlayerId(3)
        );
        assert_eq!(registry.next_available_id(), Some(PlayerId(7)));
        assert_eq!(registry.ids(), vec![
            PlayerId(0),
            PlayerId(1),
            PlayerId(3),
            PlayerId(5),
            PlayerId(6)
        ]);
    }

    #[test]
    fn automatic_id_after_the_last_id_is_rejected() {
        let mut registry = PlayerRegistry::new();
        registry
            .register(EchoProducer, Some(PlayerId(u32::MAX)))
            .unwrap();

        let err = registry.register(EchoProducer, None).unwrap_err();
        assert_eq!(err, ConfigError::IdSpaceExhausted);
        assert_eq!(registry.ids(), vec![PlayerId(u32::MAX)]);

        // Explicit ids below the maximum are still free.
        assert_eq!(
            registry.register(EchoProducer, Some(PlayerId(0))).unwrap(),
            PlayerId(0)
        );
    }

    #[test]
    fn duplicate_id_is_rejected_without_side_effects() {
        let mut registry = PlayerRegistry::new();
        registry.register(EchoProducer, Some(PlayerId(2))).unwrap();

        let err = registry
            .register(FixedProducer::new("x"), Some(PlayerId(2)))
            .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateId { id: PlayerId(2) });
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.automated_players(), &[PlayerId(2)]);
    }

    #[test]
    fn validate_count_compares_exactly() {
        let mut registry = PlayerRegistry::new();
        assert!(registry.validate_count(0));
        for _ in 0..3 {
            registry.register(EchoProducer, None).unwrap();
        }
        assert!(registry.validate_count(3));
        assert!(!registry.validate_count(2));
        assert!(!registry.validate_count(4));
    }

    #[test]
    fn resolve_unknown_player_fails() {
        let registry = PlayerRegistry::new();
        assert_eq!(
            registry.resolve(PlayerId(9)).err(),
            Some(ConfigError::UnknownPlayer { id: PlayerId(9) })
        );
    }

    #[test]
    fn roster_groups_players_by_capability() {
        let (human, _handle) = bridge::channel();
        let mut registry = PlayerRegistry::new();
        registry.register(EchoProducer, None).unwrap();
        registry.register(human, None).unwrap();
        registry.register(EchoProducer, None).unwrap();

        let roster = registry.roster();
        assert_eq!(roster.human_players, vec![PlayerId(1)]);
        assert_eq!(roster.automated_players, vec![PlayerId(0), PlayerId(2)]);
        assert_eq!(roster.total.len(), 3);
        assert_eq!(registry.kind_of(PlayerId(1)), Some(ProducerKind::Interactive));
        assert_eq!(registry.kind_of(PlayerId(4)), None);
    }
}
