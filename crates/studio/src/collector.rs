//! Story text input and submission.
//!
//! [`InputCollector`] holds the story text and, on submit, publishes a
//! `generation-requested` event. It never calls the simulator and never
//! waits for generation to finish.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use storyreel_core::error::CoreError;
use storyreel_core::story::{validate_story_text, SAMPLE_STORY_TEXT};
use storyreel_events::{EventBus, StudioEvent};
use tokio::sync::RwLock;

use crate::notifications::{Notification, Notifier};

/// Clears the in-flight flag however `submit` exits.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Collects story text and dispatches generation requests.
pub struct InputCollector {
    bus: Arc<EventBus>,
    notifier: Arc<Notifier>,
    text: RwLock<String>,
    generating: AtomicBool,
    /// Wait between a valid submit and publishing the request.
    dispatch_delay: Duration,
}

impl InputCollector {
    pub fn new(bus: Arc<EventBus>, notifier: Arc<Notifier>, dispatch_delay: Duration) -> Self {
        Self {
            bus,
            notifier,
            text: RwLock::new(String::new()),
            generating: AtomicBool::new(false),
            dispatch_delay,
        }
    }

    pub async fn text(&self) -> String {
        self.text.read().await.clone()
    }

    pub async fn set_text(&self, text: impl Into<String>) {
        *self.text.write().await = text.into();
    }

    /// Replace the text with the built-in sample excerpt.
    pub async fn load_sample(&self) {
        self.set_text(SAMPLE_STORY_TEXT).await;
    }

    /// `true` while a submit is between validation and dispatch.
    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::SeqCst)
    }

    /// Submit the current text on behalf of `user_id`.
    ///
    /// Blank text fails with [`CoreError::Validation`]. A missing user fails
    /// with [`CoreError::AuthRequired`] carrying the sign-in redirect. A
    /// submit while another is still in flight fails with
    /// [`CoreError::Conflict`]. None of these publish anything. On success
    /// exactly one `generation-requested` event is published with the text
    /// unchanged.
    pub async fn submit(&self, user_id: Option<&str>) -> Result<(), CoreError> {
        let text = self.text().await;

        if let Err(e) = validate_story_text(&text) {
            self.notifier.notify(Notification::text_required());
            return Err(e);
        }

        let Some(user_id) = user_id.filter(|id| !id.trim().is_empty()) else {
            self.notifier.notify(Notification::auth_required());
            let err = CoreError::auth_required();
            tracing::info!(error = %err, "Submit without a signed-in user");
            return Err(err);
        };

        if self
            .generating
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            self.notifier.notify(Notification::generation_in_progress());
            return Err(CoreError::Conflict(
                "A generation request is already being submitted".to_string(),
            ));
        }
        let _in_flight = InFlight(&self.generating);

        if !self.dispatch_delay.is_zero() {
            tokio::time::sleep(self.dispatch_delay).await;
        }

        let reached = self.bus.publish(StudioEvent::generation_requested(
            text,
            Some(user_id.to_string()),
        ));
        if reached == 0 {
            tracing::warn!(user_id, "Generation requested but no preview is listening");
        }

        self.notifier.notify(Notification::generation_started());
        Ok(())
    }
}
