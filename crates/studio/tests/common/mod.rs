#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use storyreel_core::error::CoreError;
use storyreel_core::frames::PlaceholderFrames;
use storyreel_store::{KeyValueStore, MemoryStore};
use storyreel_studio::{
    AudioBackend, JobSnapshot, Notification, Notifier, Playback, ProgressSimulator, StudioConfig,
};
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;

/// Configuration with the production timings (1 s ticks, 10 frames, 2 s
/// delays). Tests run on a paused clock, so these cost no wall time.
pub fn test_config() -> StudioConfig {
    StudioConfig::default()
}

/// Same as [`test_config`] but publishing immediately on submit.
pub fn instant_dispatch_config() -> StudioConfig {
    StudioConfig {
        dispatch_delay: Duration::ZERO,
        ..StudioConfig::default()
    }
}

pub fn memory_store() -> Arc<dyn KeyValueStore> {
    Arc::new(MemoryStore::new())
}

/// A simulator over the placeholder frames plus its notifier.
pub fn simulator_with(store: Arc<dyn KeyValueStore>) -> (Arc<ProgressSimulator>, Arc<Notifier>) {
    let notifier = Arc::new(Notifier::new());
    let simulator = Arc::new(ProgressSimulator::new(
        &test_config(),
        store,
        Arc::clone(&notifier),
        Arc::new(PlaceholderFrames),
    ));
    (simulator, notifier)
}

/// Let spawned tasks run without advancing the clock.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

/// Everything currently buffered on a notification receiver.
pub fn drain(rx: &mut broadcast::Receiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n);
    }
    out
}

pub fn titles(notifications: &[Notification]) -> Vec<String> {
    notifications.iter().map(|n| n.title.clone()).collect()
}

/// Wait until the job state satisfies `pred`.
pub async fn wait_for_state(
    rx: &mut watch::Receiver<JobSnapshot>,
    pred: impl FnMut(&JobSnapshot) -> bool,
) -> JobSnapshot {
    rx.wait_for(pred)
        .await
        .expect("simulator state channel should stay open")
        .clone()
}

// ---------------------------------------------------------------------------
// Fake audio backend
// ---------------------------------------------------------------------------

struct Started {
    source: String,
    stop: CancellationToken,
    done: CancellationToken,
}

/// Audio backend that records every playback and never ends one on its own.
#[derive(Default)]
pub struct FakeAudio {
    fail: AtomicBool,
    started: Mutex<Vec<Started>>,
    /// Plays that began while an earlier playback had not been stopped.
    overlaps: AtomicUsize,
}

impl FakeAudio {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let fake = Self::default();
        fake.fail.store(true, Ordering::SeqCst);
        Arc::new(fake)
    }

    pub fn sources(&self) -> Vec<String> {
        self.started
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.source.clone())
            .collect()
    }

    pub fn is_stopped(&self, index: usize) -> bool {
        self.started.lock().unwrap()[index].stop.is_cancelled()
    }

    /// End playback `index` as if the sample ran out.
    pub fn finish(&self, index: usize) {
        self.started.lock().unwrap()[index].done.cancel();
    }

    pub fn overlaps(&self) -> usize {
        self.overlaps.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioBackend for FakeAudio {
    async fn play(&self, source: &str) -> Result<Playback, CoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::Playback("decoder unavailable".to_string()));
        }

        let mut started = self.started.lock().unwrap();
        let still_playing = started
            .iter()
            .filter(|s| !s.stop.is_cancelled() && !s.done.is_cancelled())
            .count();
        self.overlaps.fetch_add(still_playing, Ordering::SeqCst);

        let stop = CancellationToken::new();
        let done = CancellationToken::new();

        // Stopping ends playback, like a real backend would report.
        let (watch_stop, watch_done) = (stop.clone(), done.clone());
        tokio::spawn(async move {
            watch_stop.cancelled().await;
            watch_done.cancel();
        });

        started.push(Started {
            source: source.to_string(),
            stop: stop.clone(),
            done: done.clone(),
        });
        Ok(Playback::new(stop, done))
    }
}
