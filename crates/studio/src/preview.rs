//! Voice sample preview with at most one sample playing at a time.
//!
//! Exclusivity is enforced here, not by the [`AudioBackend`]: starting a
//! sample always stops the previous one first.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use storyreel_core::error::CoreError;
use storyreel_core::preferences::find_voice;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::notifications::{Notification, Notifier};

// ---------------------------------------------------------------------------
// Audio backend
// ---------------------------------------------------------------------------

/// Handle to one in-progress playback.
///
/// `stop` is cancelled by the owner to end playback early; `done` is
/// cancelled by the backend once playback has ended for any reason.
#[derive(Debug, Clone)]
pub struct Playback {
    stop: CancellationToken,
    done: CancellationToken,
}

impl Playback {
    pub fn new(stop: CancellationToken, done: CancellationToken) -> Self {
        Self { stop, done }
    }

    /// Ask the backend to end playback.
    pub fn stop(&self) {
        self.stop.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.done.is_cancelled()
    }

    /// Resolves once playback has ended.
    pub async fn finished(&self) {
        self.done.cancelled().await;
    }
}

/// Something that can play a sample from a URL.
#[async_trait]
pub trait AudioBackend: Send + Sync {
    /// Begin playing `source`. Resolves once playback has started, or with
    /// [`CoreError::Playback`] if the sample cannot be loaded.
    async fn play(&self, source: &str) -> Result<Playback, CoreError>;
}

/// Backend that "plays" every sample for a fixed duration without producing
/// sound.
#[derive(Debug, Clone)]
pub struct SimulatedAudioBackend {
    duration: Duration,
}

impl SimulatedAudioBackend {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

#[async_trait]
impl AudioBackend for SimulatedAudioBackend {
    async fn play(&self, source: &str) -> Result<Playback, CoreError> {
        if !source.starts_with("http://") && !source.starts_with("https://") {
            return Err(CoreError::Playback(format!(
                "Unsupported sample source: '{source}'"
            )));
        }

        let stop = CancellationToken::new();
        let done = CancellationToken::new();
        let duration = self.duration;
        let (task_stop, task_done) = (stop.clone(), done.clone());
        let source = source.to_string();

        tokio::spawn(async move {
            tokio::select! {
                _ = task_stop.cancelled() => {
                    tracing::debug!(%source, "Sample playback stopped");
                }
                _ = tokio::time::sleep(duration) => {
                    tracing::debug!(%source, "Sample playback ended");
                }
            }
            task_done.cancel();
        });

        Ok(Playback::new(stop, done))
    }
}

// ---------------------------------------------------------------------------
// VoicePreview
// ---------------------------------------------------------------------------

struct Playing {
    voice_id: String,
    playback: Playback,
    /// Distinguishes successive playbacks of the same voice.
    generation: u64,
}

#[derive(Default)]
struct PreviewState {
    playing: Option<Playing>,
    generation: u64,
}

/// Plays voice samples on request, one at a time.
pub struct VoicePreview {
    backend: Arc<dyn AudioBackend>,
    notifier: Arc<Notifier>,
    state: Arc<Mutex<PreviewState>>,
}

impl VoicePreview {
    pub fn new(backend: Arc<dyn AudioBackend>, notifier: Arc<Notifier>) -> Self {
        Self {
            backend,
            notifier,
            state: Arc::new(Mutex::new(PreviewState::default())),
        }
    }

    /// Voice whose sample is currently playing, if any.
    pub async fn playing(&self) -> Option<String> {
        self.state
            .lock()
            .await
            .playing
            .as_ref()
            .map(|p| p.voice_id.clone())
    }

    /// Toggle the sample for `voice_id`.
    ///
    /// - same voice playing: stop it.
    /// - another voice playing: stop that one, then start this one.
    /// - nothing playing: start this one.
    ///
    /// Failures are shown as notifications and leave nothing playing.
    pub async fn toggle(&self, voice_id: &str) -> Result<(), CoreError> {
        let Some(sample) = find_voice(voice_id).and_then(|v| v.sample_audio) else {
            self.notifier.notify(Notification::sample_unavailable());
            return Err(CoreError::UnavailableSample(format!(
                "No sample registered for voice '{voice_id}'"
            )));
        };

        let mut state = self.state.lock().await;

        if let Some(current) = state.playing.take() {
            current.playback.stop();
            if current.voice_id == voice_id {
                tracing::debug!(voice = voice_id, "Stopped voice sample");
                return Ok(());
            }
            tracing::debug!(
                stopped = %current.voice_id,
                voice = voice_id,
                "Switching voice sample",
            );
        }

        let playback = match self.backend.play(sample).await {
            Ok(playback) => playback,
            Err(e) => {
                tracing::warn!(voice = voice_id, error = %e, "Voice sample failed to play");
                self.notifier.notify(Notification::playback_error());
                return Err(match e {
                    CoreError::Playback(_) => e,
                    other => CoreError::Playback(other.to_string()),
                });
            }
        };

        state.generation += 1;
        let generation = state.generation;
        state.playing = Some(Playing {
            voice_id: voice_id.to_string(),
            playback: playback.clone(),
            generation,
        });
        drop(state);

        // Clear the playing marker when this playback ends on its own.
        let shared = Arc::clone(&self.state);
        tokio::spawn(async move {
            playback.finished().await;
            let mut state = shared.lock().await;
            if state.playing.as_ref().map(|p| p.generation) == Some(generation) {
                state.playing = None;
            }
        });

        tracing::debug!(voice = voice_id, "Started voice sample");
        Ok(())
    }

    /// Stop whatever is playing.
    pub async fn stop(&self) {
        if let Some(current) = self.state.lock().await.playing.take() {
            current.playback.stop();
        }
    }
}
