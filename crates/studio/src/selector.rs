//! Persisted single-choice preference (style or voice).
//!
//! The selection is validated on write and on read: [`select`] rejects ids
//! outside the kind's option set, and [`load`] treats an unrecognized
//! persisted value the same as an absent one.
//!
//! [`select`]: PreferenceSelector::select
//! [`load`]: PreferenceSelector::load

use std::sync::Arc;

use storyreel_core::error::CoreError;
use storyreel_core::preferences::{resolve_persisted, validate_option, PreferenceKind};
use storyreel_events::{EventBus, StudioEvent};
use storyreel_store::KeyValueStore;
use tokio::sync::RwLock;

use crate::notifications::{Notification, Notifier};

/// A selector widget for one preference kind.
pub struct PreferenceSelector {
    kind: PreferenceKind,
    store: Arc<dyn KeyValueStore>,
    bus: Arc<EventBus>,
    notifier: Arc<Notifier>,
    selected: RwLock<String>,
}

impl PreferenceSelector {
    /// Initialise from durable storage.
    ///
    /// Uses the persisted id when it is a valid option, otherwise the kind's
    /// default. Loading neither writes storage nor publishes an event.
    pub async fn load(
        kind: PreferenceKind,
        store: Arc<dyn KeyValueStore>,
        bus: Arc<EventBus>,
        notifier: Arc<Notifier>,
    ) -> Result<Self, CoreError> {
        let persisted = store.get(kind.storage_key()).await?;
        let selected = resolve_persisted(kind, persisted.as_deref());

        if let Some(raw) = persisted.as_deref().filter(|raw| *raw != selected) {
            tracing::warn!(
                %kind,
                persisted = raw,
                fallback = selected,
                "Ignoring unrecognized persisted preference",
            );
        }

        Ok(Self {
            kind,
            store,
            bus,
            notifier,
            selected: RwLock::new(selected.to_string()),
        })
    }

    pub fn kind(&self) -> PreferenceKind {
        self.kind
    }

    /// Currently selected option id.
    pub async fn selected(&self) -> String {
        self.selected.read().await.clone()
    }

    /// Select `option_id`, persist it, and announce the change.
    ///
    /// Unknown ids fail with [`CoreError::Validation`] and show an
    /// "Invalid Selection" notification. Re-selecting the current option
    /// still persists and publishes.
    pub async fn select(&self, option_id: &str) -> Result<(), CoreError> {
        if let Err(e) = validate_option(self.kind, option_id) {
            let description = format!("'{option_id}' is not a {} option.", self.kind);
            self.notifier.notify(Notification::invalid_selection(description));
            return Err(e);
        }

        let mut selected = self.selected.write().await;
        self.store.set(self.kind.storage_key(), option_id).await?;
        *selected = option_id.to_string();
        drop(selected);

        let event = match self.kind {
            PreferenceKind::Style => StudioEvent::StyleChanged {
                style: option_id.to_string(),
            },
            PreferenceKind::Voice => StudioEvent::VoiceChanged {
                voice: option_id.to_string(),
            },
        };
        self.bus.publish(event);

        tracing::info!(kind = %self.kind, option = option_id, "Preference selected");
        Ok(())
    }
}
