//! StoryReel studio event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`, injected into every component.
//! - [`StudioEvent`]: the typed events exchanged between components.
//! - [`EventRecorder`]: background subscriber that captures every event
//!   for inspection and replay.

pub mod bus;
pub mod recorder;

pub use bus::{EventBus, GenerationRequest, StudioEvent};
pub use recorder::{EventRecorder, RecordedEvent};
