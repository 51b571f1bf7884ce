//! Engine notifications and the sinks that consume them.
//!
//! The engine pushes every lifecycle notification through [`EventSink`]; the
//! [`EventBus`] republishes them on broadcast topics for async consumers and
//! the [`Transcript`] keeps a readable log.

mod bus;
mod sink;
mod transcript;

pub use bus::{EngineEvent, EventBus, Topic};
pub(crate) use sink::Fanout;
pub use sink::{Callbacks, EventSink, LogSink, NoopSink};
pub use transcript::{EntryKind, Transcript, TranscriptEntry};
