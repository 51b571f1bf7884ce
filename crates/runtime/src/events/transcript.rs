//! Bounded, timestamped record of a session for display.
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use arena_core::{Action, Info, Observation, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::sink::EventSink;
use crate::engine::{PendingTurn, SessionOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntryKind {
    Observation,
    Action,
    System,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub kind: EntryKind,
    pub player: Option<PlayerId>,
    pub content: String,
    pub at: DateTime<Utc>,
}

/// Event sink that keeps the most recent entries of a session.
pub struct Transcript {
    entries: Mutex<VecDeque<TranscriptEntry>>,
    capacity: usize,
    preview_chars: usize,
}

impl Transcript {
    pub const DEFAULT_CAPACITY: usize = 512;
    pub const DEFAULT_PREVIEW: usize = 200;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity: capacity.max(1),
            preview_chars: Self::DEFAULT_PREVIEW,
        }
    }

    /// Observation text longer than `chars` is cut for display.
    pub fn preview_chars(mut self, chars: usize) -> Self {
        self.preview_chars = chars;
        self
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<TranscriptEntry>> {
        // Entries are plain data; a panic mid-push cannot leave them inconsistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, kind: EntryKind, player: Option<PlayerId>, content: String) {
        let mut entries = self.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(TranscriptEntry {
            kind,
            player,
            content,
            at: Utc::now(),
        });
    }

    pub fn entries(&self) -> Vec<TranscriptEntry> {
        self.lock().iter().cloned().collect()
    }

    /// The last `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> Vec<TranscriptEntry> {
        let entries = self.lock();
        let skip = entries.len().saturating_sub(n);
        entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for Transcript {
    fn on_observation(&self, player: PlayerId, observation: &Observation) {
        let content = observation.preview(self.preview_chars);
        self.push(EntryKind::Observation, Some(player), content);
    }

    fn on_action(&self, player: PlayerId, action: &Action) {
        self.push(EntryKind::Action, Some(player), action.as_str().to_owned());
    }

    fn on_step_complete(&self, done: bool, _info: &Info) {
        if done {
            self.push(EntryKind::System, None, "game over".to_owned());
        }
    }

    fn on_suspended(&self, pending: &PendingTurn) {
        let content = format!("waiting for {}", pending.player);
        self.push(EntryKind::System, Some(pending.player), content);
    }

    fn on_finished(&self, outcome: &SessionOutcome) {
        match outcome {
            SessionOutcome::Finished(result) => {
                let content = format!("{} after {} steps", result.status, result.steps);
                self.push(EntryKind::System, None, content);
            }
            SessionOutcome::Failed(failure) => {
                self.push(EntryKind::Error, None, failure.reason.clone());
            }
        }
    }
}
