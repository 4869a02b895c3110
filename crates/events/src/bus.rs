//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`StudioEvent`]s. It is
//! shared via `Arc<EventBus>`; publishers never hold a reference to any
//! subscriber.

use serde::{Deserialize, Serialize};
use storyreel_core::job_events::{
    EVENT_GENERATION_REQUESTED, EVENT_STYLE_CHANGED, EVENT_VOICE_CHANGED,
};
use storyreel_core::types::UserId;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// StudioEvent
// ---------------------------------------------------------------------------

/// Payload of a `generation-requested` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Story text exactly as submitted.
    pub text: String,
    /// Submitting user.
    pub user_id: Option<UserId>,
}

/// An event exchanged between studio components.
///
/// Serializes as `{"event": "<name>", "detail": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "detail", rename_all = "kebab-case")]
pub enum StudioEvent {
    /// A story was submitted and a video should be generated.
    GenerationRequested(GenerationRequest),

    /// The persisted style preference changed.
    StyleChanged { style: String },

    /// The persisted voice preference changed.
    VoiceChanged { voice: String },
}

impl StudioEvent {
    /// Build a `generation-requested` event.
    pub fn generation_requested(text: impl Into<String>, user_id: Option<UserId>) -> Self {
        StudioEvent::GenerationRequested(GenerationRequest {
            text: text.into(),
            user_id,
        })
    }

    /// Wire name of this event.
    pub fn event_name(&self) -> &'static str {
        match self {
            StudioEvent::GenerationRequested(_) => EVENT_GENERATION_REQUESTED,
            StudioEvent::StyleChanged { .. } => EVENT_STYLE_CHANGED,
            StudioEvent::VoiceChanged { .. } => EVENT_VOICE_CHANGED,
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`StudioEvent`]. Delivery is
/// best-effort: only receivers subscribed at publish time see an event.
///
/// # Usage
///
/// ```rust
/// use storyreel_events::bus::{EventBus, StudioEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(StudioEvent::StyleChanged { style: "anime".into() });
/// ```
pub struct EventBus {
    sender: broadcast::Sender<StudioEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Returns the number of subscribers reached. With no subscribers the
    /// event is dropped and `0` is returned.
    pub fn publish(&self, event: StudioEvent) -> usize {
        let name = event.event_name();
        // A SendError only means there are zero receivers.
        let reached = self.sender.send(event).unwrap_or(0);
        tracing::trace!(event = name, reached, "Published event");
        reached
    }

    /// Subscribe to all events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<StudioEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
