//! Event names carried on the studio event bus.
//!
//! The names match the wire form used by `StudioEvent` serialization in
//! `storyreel-events`, so recorded events can be filtered by name.

/// A submitted story should be turned into a video.
pub const EVENT_GENERATION_REQUESTED: &str = "generation-requested";

/// The selected animation style changed.
pub const EVENT_STYLE_CHANGED: &str = "style-changed";

/// The selected narration voice changed.
pub const EVENT_VOICE_CHANGED: &str = "voice-changed";

/// All event names, in declaration order.
pub const ALL_EVENTS: &[&str] = &[
    EVENT_GENERATION_REQUESTED,
    EVENT_STYLE_CHANGED,
    EVENT_VOICE_CHANGED,
];
