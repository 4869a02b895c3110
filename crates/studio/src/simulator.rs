//! Simulated video generation.
//!
//! [`ProgressSimulator`] is an explicit `Idle -> Running -> Complete` state
//! machine that owns one cancellable repeating tick task. Each tick reveals
//! one placeholder frame and advances the completion percentage; the last
//! tick completes the job and enables the terminal actions (download,
//! share). A new request while a job is running cancels the old tick task
//! before the state is reset, so at most one job is ever live.
//!
//! State is published through a `tokio::sync::watch` channel; call
//! [`ProgressSimulator::subscribe`] to follow it.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use storyreel_core::error::CoreError;
use storyreel_core::frames::{frame_for_tick, progress_percent, FrameCatalog};
use storyreel_core::preferences::{resolve_persisted, PreferenceKind};
use storyreel_core::story::log_preview;
use storyreel_events::{GenerationRequest, StudioEvent};
use storyreel_store::KeyValueStore;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::StudioConfig;
use crate::notifications::{Notification, Notifier};

/// Shortest tick period accepted; a zero period would spin.
const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Longest tick period accepted; the first tick deadline must fit in an
/// `Instant`.
const MAX_TICK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

// ---------------------------------------------------------------------------
// Job state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Idle,
    Running,
    Complete,
}

/// Observable state of the current job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSnapshot {
    /// `None` until the first job starts.
    pub job_id: Option<Uuid>,
    pub status: JobStatus,
    /// 0-100, non-decreasing within a job.
    pub progress: u8,
    /// Ticks elapsed in this job.
    pub frame_count: u32,
    pub total_frames: u32,
    /// Revealed frame references, in reveal order.
    pub frames: Vec<String>,
    /// Index into `frames` of the frame on display.
    pub current_frame: usize,
    /// Style read at job start.
    pub style: Option<String>,
    /// Voice read at job start.
    pub voice: Option<String>,
}

impl JobSnapshot {
    pub fn idle(total_frames: u32) -> Self {
        Self {
            job_id: None,
            status: JobStatus::Idle,
            progress: 0,
            frame_count: 0,
            total_frames,
            frames: Vec::new(),
            current_frame: 0,
            style: None,
            voice: None,
        }
    }

    /// Fresh `Running` state for a new job.
    pub fn started(job_id: Uuid, total_frames: u32, style: &str, voice: &str) -> Self {
        Self {
            job_id: Some(job_id),
            status: JobStatus::Running,
            style: Some(style.to_string()),
            voice: Some(voice.to_string()),
            ..Self::idle(total_frames)
        }
    }

    /// Advance by one tick, revealing the next frame from `catalog`.
    ///
    /// Returns `true` on the tick that completes the job. Ticks outside
    /// `Running` change nothing.
    pub fn apply_tick(&mut self, catalog: &[String]) -> bool {
        if self.status != JobStatus::Running {
            return false;
        }

        self.frame_count += 1;
        self.progress = progress_percent(self.frame_count, self.total_frames);

        if self.frame_count <= self.total_frames {
            if let Some(frame) = frame_for_tick(catalog, self.frame_count) {
                self.frames.push(frame.to_string());
                self.current_frame = self.frames.len() - 1;
            }
        }

        if self.frame_count >= self.total_frames {
            self.status = JobStatus::Complete;
            return true;
        }
        false
    }

    /// Frame reference on display, if any frame has been revealed.
    pub fn displayed_frame(&self) -> Option<&str> {
        self.frames.get(self.current_frame).map(String::as_str)
    }

    pub fn is_complete(&self) -> bool {
        self.status == JobStatus::Complete
    }
}

// ---------------------------------------------------------------------------
// ProgressSimulator
// ---------------------------------------------------------------------------

/// The tick task of the live job.
struct Ticker {
    job_id: Uuid,
    cancel: CancellationToken,
}

/// Runs simulated generation jobs, one at a time.
pub struct ProgressSimulator {
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<Notifier>,
    catalog: Arc<dyn FrameCatalog>,
    tick_interval: Duration,
    total_frames: u32,
    download_delay: Duration,
    state: Arc<watch::Sender<JobSnapshot>>,
    ticker: Mutex<Option<Ticker>>,
    /// Cancelled on disposal; parent of every tick and delayed task.
    cancel: CancellationToken,
}

impl ProgressSimulator {
    pub fn new(
        config: &StudioConfig,
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<Notifier>,
        catalog: Arc<dyn FrameCatalog>,
    ) -> Self {
        let total_frames = config.total_frames.max(1);
        let (state, _) = watch::channel(JobSnapshot::idle(total_frames));

        Self {
            store,
            notifier,
            catalog,
            tick_interval: config
                .tick_interval
                .clamp(MIN_TICK_INTERVAL, MAX_TICK_INTERVAL),
            total_frames,
            download_delay: config.download_delay,
            state: Arc::new(state),
            ticker: Mutex::new(None),
            cancel: CancellationToken::new(),
        }
    }

    /// Current state.
    pub fn snapshot(&self) -> JobSnapshot {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> JobStatus {
        self.state.borrow().status
    }

    /// Follow state changes.
    pub fn subscribe(&self) -> watch::Receiver<JobSnapshot> {
        self.state.subscribe()
    }

    pub fn is_disposed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Start a job for `request`, superseding any running job.
    ///
    /// The previous tick task is cancelled before any state is reset, so no
    /// frame from the superseded job can land in the new one.
    pub async fn start_job(&self, request: &GenerationRequest) -> Result<Uuid, CoreError> {
        if self.is_disposed() {
            return Err(CoreError::Conflict("Simulator has been disposed".to_string()));
        }

        let mut ticker = self.ticker.lock().await;
        if let Some(previous) = ticker.take() {
            previous.cancel.cancel();
            tracing::info!(job_id = %previous.job_id, "Superseding running job");
        }

        let style = self.read_preference(PreferenceKind::Style).await;
        let voice = self.read_preference(PreferenceKind::Voice).await;

        let frames = self.catalog.frames_for(&style, &voice);
        if frames.is_empty() {
            self.state.send_replace(JobSnapshot::idle(self.total_frames));
            return Err(CoreError::Internal(format!(
                "No frames available for style '{style}'"
            )));
        }

        let job_id = Uuid::now_v7();
        self.state
            .send_replace(JobSnapshot::started(job_id, self.total_frames, &style, &voice));

        tracing::info!(
            %job_id,
            text = log_preview(&request.text),
            style = %style,
            voice = %voice,
            user_id = request.user_id.as_deref().unwrap_or("-"),
            "Generating video",
        );

        let cancel = self.cancel.child_token();
        tokio::spawn(run_ticks(
            Arc::clone(&self.state),
            Arc::clone(&self.notifier),
            job_id,
            frames,
            self.tick_interval,
            cancel.clone(),
        ));
        *ticker = Some(Ticker { job_id, cancel });

        Ok(job_id)
    }

    /// Show revealed frame `index`. Does not affect progress.
    pub fn select_frame(&self, index: usize) -> Result<(), CoreError> {
        let mut revealed = 0;
        let changed = self.state.send_if_modified(|snap| {
            revealed = snap.frames.len();
            if index < revealed && snap.current_frame != index {
                snap.current_frame = index;
                true
            } else {
                false
            }
        });

        if index >= revealed {
            return Err(CoreError::Validation(format!(
                "Frame {index} has not been revealed ({revealed} available)"
            )));
        }
        if changed {
            tracing::debug!(index, "Frame selected");
        }
        Ok(())
    }

    /// Simulate a download: "started" now, "complete" after the configured
    /// delay. Only allowed once the job is complete.
    pub fn download(&self) -> Result<(), CoreError> {
        self.ensure_complete()?;
        self.notifier.notify(Notification::download_started());

        let notifier = Arc::clone(&self.notifier);
        let cancel = self.cancel.child_token();
        let delay = self.download_delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    notifier.notify(Notification::download_complete());
                }
            }
        });
        Ok(())
    }

    /// Simulate sharing. Only allowed once the job is complete.
    pub fn share(&self) -> Result<(), CoreError> {
        self.ensure_complete()?;
        self.notifier.notify(Notification::share_link_generated());
        Ok(())
    }

    /// Stop the tick task and any pending delayed notification.
    ///
    /// The current state stays readable; no further job can start.
    pub fn dispose(&self) {
        if !self.cancel.is_cancelled() {
            self.cancel.cancel();
            tracing::debug!("Progress simulator disposed");
        }
    }

    /// React to `generation-requested` events until the bus closes or the
    /// simulator is disposed.
    pub async fn run(self: Arc<Self>, mut receiver: broadcast::Receiver<StudioEvent>) {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Simulator disposed, leaving event loop");
                    break;
                }
                received = receiver.recv() => match received {
                    Ok(StudioEvent::GenerationRequested(request)) => {
                        if let Err(e) = self.start_job(&request).await {
                            tracing::error!(error = %e, "Failed to start generation job");
                        }
                    }
                    Ok(other) => {
                        tracing::debug!(event = other.event_name(), "Preference change observed");
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Simulator lagged behind the event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Event bus closed, simulator shutting down");
                        break;
                    }
                },
            }
        }
    }

    // ---- private helpers ----

    fn ensure_complete(&self) -> Result<(), CoreError> {
        if self.status() == JobStatus::Complete {
            Ok(())
        } else {
            Err(CoreError::Conflict("Video is not ready yet".to_string()))
        }
    }

    /// Persisted preference, or the default when absent, invalid or
    /// unreadable.
    async fn read_preference(&self, kind: PreferenceKind) -> String {
        let persisted = match self.store.get(kind.storage_key()).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(%kind, error = %e, "Failed to read preference, using default");
                None
            }
        };
        resolve_persisted(kind, persisted.as_deref()).to_string()
    }
}

impl Drop for ProgressSimulator {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Tick loop of one job. Exits on completion, cancellation, or when the
/// shared state no longer belongs to `job_id`.
async fn run_ticks(
    state: Arc<watch::Sender<JobSnapshot>>,
    notifier: Arc<Notifier>,
    job_id: Uuid,
    frames: Vec<String>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(%job_id, "Tick task cancelled");
                return;
            }
            _ = interval.tick() => {}
        }

        let mut stale = false;
        let mut completed = false;
        let mut progress = 0;
        state.send_if_modified(|snap| {
            if snap.job_id != Some(job_id) {
                stale = true;
                return false;
            }
            completed = snap.apply_tick(&frames);
            progress = snap.progress;
            true
        });

        if stale {
            tracing::debug!(%job_id, "Job superseded, tick task exiting");
            return;
        }

        tracing::debug!(%job_id, progress, "Frame revealed");

        if completed {
            tracing::info!(%job_id, "Video generation complete");
            notifier.notify(Notification::video_generated());
            return;
        }
    }
}
