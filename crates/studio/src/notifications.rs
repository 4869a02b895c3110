//! Transient user-facing notifications ("toasts").
//!
//! [`Notifier`] fans each [`Notification`] out to any number of listeners
//! over a broadcast channel and mirrors it to the tracing log. Nothing is
//! retained; a notification nobody is listening for is only logged.

use serde::Serialize;
use tokio::sync::broadcast;

const NOTIFICATION_CHANNEL_CAPACITY: usize = 256;

/// Visual treatment of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationVariant {
    Default,
    Success,
    Destructive,
}

/// A short message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        variant: NotificationVariant,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant,
        }
    }

    pub fn text_required() -> Self {
        Self::new(
            "Text Required",
            "Please enter some text to generate a video.",
            NotificationVariant::Destructive,
        )
    }

    pub fn auth_required() -> Self {
        Self::new(
            "Authentication Required",
            "Please sign in to generate videos.",
            NotificationVariant::Destructive,
        )
    }

    pub fn generation_started() -> Self {
        Self::new(
            "Generation Started",
            "Your video is being generated. You'll see frames appear in the preview.",
            NotificationVariant::Default,
        )
    }

    pub fn video_generated() -> Self {
        Self::new(
            "Video Generated",
            "Your video is ready to download or share.",
            NotificationVariant::Default,
        )
    }

    pub fn download_started() -> Self {
        Self::new(
            "Download Started",
            "Your video is being prepared for download.",
            NotificationVariant::Default,
        )
    }

    pub fn download_complete() -> Self {
        Self::new(
            "Download Complete",
            "Your video has been downloaded.",
            NotificationVariant::Success,
        )
    }

    pub fn share_link_generated() -> Self {
        Self::new(
            "Share Link Generated",
            "A shareable link has been copied to your clipboard.",
            NotificationVariant::Default,
        )
    }

    pub fn sample_unavailable() -> Self {
        Self::new(
            "Sample Unavailable",
            "Voice sample is not available at this time.",
            NotificationVariant::Destructive,
        )
    }

    pub fn playback_error() -> Self {
        Self::new(
            "Playback Error",
            "Could not play the voice sample. Please try again.",
            NotificationVariant::Destructive,
        )
    }

    pub fn generation_in_progress() -> Self {
        Self::new(
            "Generation In Progress",
            "Please wait for the current request to finish.",
            NotificationVariant::Destructive,
        )
    }

    pub fn invalid_selection(description: impl Into<String>) -> Self {
        Self::new(
            "Invalid Selection",
            description,
            NotificationVariant::Destructive,
        )
    }
}

/// Broadcasts notifications to listeners.
pub struct Notifier {
    sender: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(NOTIFICATION_CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Show a notification.
    pub fn notify(&self, notification: Notification) {
        match notification.variant {
            NotificationVariant::Destructive => tracing::warn!(
                title = %notification.title,
                description = %notification.description,
                "Notification"
            ),
            _ => tracing::info!(
                title = %notification.title,
                description = %notification.description,
                "Notification"
            ),
        }
        // Zero listeners is fine; the log line above is the fallback.
        let _ = self.sender.send(notification);
    }

    /// Listen for notifications shown from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listeners_receive_notifications() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();

        notifier.notify(Notification::download_complete());

        let received = rx.recv().await.expect("should receive notification");
        assert_eq!(received.title, "Download Complete");
        assert_eq!(received.variant, NotificationVariant::Success);
    }

    #[test]
    fn notify_without_listeners_does_not_panic() {
        Notifier::new().notify(Notification::share_link_generated());
    }

    #[test]
    fn error_notifications_are_destructive() {
        for n in [
            Notification::text_required(),
            Notification::auth_required(),
            Notification::sample_unavailable(),
            Notification::playback_error(),
            Notification::generation_in_progress(),
            Notification::invalid_selection("Unknown style"),
        ] {
            assert_eq!(n.variant, NotificationVariant::Destructive, "{}", n.title);
        }
    }
}
