//! Event capture for inspection and replay.
//!
//! [`EventRecorder`] subscribes to the [`EventBus`] broadcast channel and
//! appends every received [`StudioEvent`] to an in-memory log. It runs as a
//! long-lived background task and stops when the bus is dropped or its
//! [`CancellationToken`] fires.

use std::sync::Arc;

use serde::Serialize;
use storyreel_core::types::Timestamp;
use tokio::sync::{broadcast, RwLock};
use tokio_util::sync::CancellationToken;

use crate::bus::{EventBus, StudioEvent};

/// An event together with the time it was received.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedEvent {
    pub received_at: Timestamp,
    #[serde(flatten)]
    pub event: StudioEvent,
}

/// Background service that records every event published on a bus.
///
/// Cheap to clone; all clones share the same log.
#[derive(Clone, Default)]
pub struct EventRecorder {
    log: Arc<RwLock<Vec<RecordedEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to `bus` and spawn the recording loop.
    pub fn spawn(&self, bus: &EventBus, cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
        let recorder = self.clone();
        let receiver = bus.subscribe();
        tokio::spawn(async move { recorder.run(receiver, cancel).await })
    }

    /// Run the recording loop until the channel closes or `cancel` fires.
    pub async fn run(
        &self,
        mut receiver: broadcast::Receiver<StudioEvent>,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("Event recorder cancelled");
                    break;
                }
                received = receiver.recv() => match received {
                    Ok(event) => self.record(event).await,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Event recorder lagged, some events were not recorded");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::debug!("Event bus closed, recorder shutting down");
                        break;
                    }
                },
            }
        }
    }

    async fn record(&self, event: StudioEvent) {
        self.log.write().await.push(RecordedEvent {
            received_at: chrono::Utc::now(),
            event,
        });
    }

    /// Snapshot of everything recorded so far, oldest first.
    pub async fn events(&self) -> Vec<RecordedEvent> {
        self.log.read().await.clone()
    }

    /// Recorded events whose wire name is `name`.
    pub async fn events_named(&self, name: &str) -> Vec<StudioEvent> {
        self.log
            .read()
            .await
            .iter()
            .filter(|r| r.event.event_name() == name)
            .map(|r| r.event.clone())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.log.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.log.read().await.is_empty()
    }

    /// Drop everything recorded so far.
    pub async fn clear(&self) {
        self.log.write().await.clear();
    }

    /// Re-publish every recorded event on `bus`, in recorded order.
    ///
    /// Returns the number of events replayed.
    pub async fn replay(&self, bus: &EventBus) -> usize {
        let events = self.events().await;
        for recorded in &events {
            bus.publish(recorded.event.clone());
        }
        tracing::debug!(count = events.len(), "Replayed recorded events");
        events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Let the spawned recorder drain its channel.
    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn records_events_in_publish_order() {
        let bus = EventBus::default();
        let recorder = EventRecorder::new();
        let cancel = CancellationToken::new();
        let handle = recorder.spawn(&bus, cancel.clone());

        bus.publish(StudioEvent::StyleChanged { style: "anime".into() });
        bus.publish(StudioEvent::generation_requested("story", Some("u1".into())));
        settle().await;

        let names: Vec<&str> = recorder
            .events()
            .await
            .iter()
            .map(|r| r.event.event_name())
            .collect();
        assert_eq!(names, vec!["style-changed", "generation-requested"]);

        cancel.cancel();
        handle.await.expect("recorder task should exit cleanly");
    }

    #[tokio::test]
    async fn stops_when_bus_is_dropped() {
        let bus = EventBus::default();
        let recorder = EventRecorder::new();
        let handle = recorder.spawn(&bus, CancellationToken::new());

        drop(bus);
        handle.await.expect("recorder task should exit cleanly");
    }

    #[tokio::test]
    async fn replay_republishes_to_new_subscribers() {
        let bus = EventBus::default();
        let recorder = EventRecorder::new();
        let cancel = CancellationToken::new();
        let handle = recorder.spawn(&bus, cancel.clone());

        bus.publish(StudioEvent::VoiceChanged { voice: "gentle".into() });
        bus.publish(StudioEvent::generation_requested("again", None));
        settle().await;
        cancel.cancel();
        handle.await.unwrap();

        let target = EventBus::default();
        let mut rx = target.subscribe();
        assert_eq!(recorder.replay(&target).await, 2);

        assert_eq!(
            rx.recv().await.unwrap(),
            StudioEvent::VoiceChanged { voice: "gentle".into() }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            StudioEvent::generation_requested("again", None)
        );
    }

    #[tokio::test]
    async fn events_named_filters_by_wire_name() {
        let bus = EventBus::default();
        let recorder = EventRecorder::new();
        let cancel = CancellationToken::new();
        let _handle = recorder.spawn(&bus, cancel.clone());

        bus.publish(StudioEvent::StyleChanged { style: "anime".into() });
        bus.publish(StudioEvent::StyleChanged { style: "cartoon".into() });
        bus.publish(StudioEvent::VoiceChanged { voice: "gentle".into() });
        settle().await;

        assert_eq!(recorder.events_named("style-changed").await.len(), 2);
        assert_eq!(recorder.events_named("voice-changed").await.len(), 1);
        assert!(recorder.events_named("generation-requested").await.is_empty());

        recorder.clear().await;
        assert!(recorder.is_empty().await);
        cancel.cancel();
    }
}
