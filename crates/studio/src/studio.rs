//! Wiring of the studio components over one bus, store and notifier.

use std::sync::Arc;

use storyreel_core::error::CoreError;
use storyreel_core::frames::{FrameCatalog, PlaceholderFrames};
use storyreel_core::library::{sample_library, VideoItem};
use storyreel_core::preferences::PreferenceKind;
use storyreel_events::EventBus;
use storyreel_store::KeyValueStore;
use tokio::task::JoinHandle;

use crate::collector::InputCollector;
use crate::config::StudioConfig;
use crate::notifications::Notifier;
use crate::preview::{AudioBackend, SimulatedAudioBackend, VoicePreview};
use crate::selector::PreferenceSelector;
use crate::simulator::ProgressSimulator;

/// All components of the book-to-video page.
///
/// The components share the bus, store and notifier but hold no references
/// to each other.
pub struct Studio {
    pub bus: Arc<EventBus>,
    pub notifier: Arc<Notifier>,
    pub collector: InputCollector,
    pub style: PreferenceSelector,
    pub voice: PreferenceSelector,
    pub preview: VoicePreview,
    pub simulator: Arc<ProgressSimulator>,
    simulator_task: JoinHandle<()>,
}

impl Studio {
    /// Mount with the placeholder frame catalogue and a simulated audio
    /// backend.
    pub async fn mount(
        config: &StudioConfig,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, CoreError> {
        let audio = Arc::new(SimulatedAudioBackend::new(config.preview_duration));
        Self::mount_with(config, store, audio, Arc::new(PlaceholderFrames)).await
    }

    /// Mount with explicit audio backend and frame catalogue.
    ///
    /// The simulator subscribes to the bus before this returns, so a request
    /// published right after mounting is not missed.
    pub async fn mount_with(
        config: &StudioConfig,
        store: Arc<dyn KeyValueStore>,
        audio: Arc<dyn AudioBackend>,
        catalog: Arc<dyn FrameCatalog>,
    ) -> Result<Self, CoreError> {
        let bus = Arc::new(EventBus::default());
        let notifier = Arc::new(Notifier::new());

        let style = PreferenceSelector::load(
            PreferenceKind::Style,
            Arc::clone(&store),
            Arc::clone(&bus),
            Arc::clone(&notifier),
        )
        .await?;
        let voice = PreferenceSelector::load(
            PreferenceKind::Voice,
            Arc::clone(&store),
            Arc::clone(&bus),
            Arc::clone(&notifier),
        )
        .await?;

        let simulator = Arc::new(ProgressSimulator::new(
            config,
            store,
            Arc::clone(&notifier),
            catalog,
        ));
        let simulator_task = tokio::spawn(Arc::clone(&simulator).run(bus.subscribe()));

        let collector =
            InputCollector::new(Arc::clone(&bus), Arc::clone(&notifier), config.dispatch_delay);
        let preview = VoicePreview::new(audio, Arc::clone(&notifier));

        let (selected_style, selected_voice) = (style.selected().await, voice.selected().await);
        tracing::info!(
            style = %selected_style,
            voice = %selected_voice,
            "Studio mounted",
        );

        Ok(Self {
            bus,
            notifier,
            collector,
            style,
            voice,
            preview,
            simulator,
            simulator_task,
        })
    }

    /// The "My Videos" listing.
    pub fn library(&self) -> Vec<VideoItem> {
        sample_library()
    }

    /// Tear down: stop sample playback, dispose the simulator and wait for
    /// its event loop to exit.
    pub async fn unmount(self) {
        self.preview.stop().await;
        self.simulator.dispose();
        if let Err(e) = self.simulator_task.await {
            tracing::error!(error = %e, "Simulator task ended abnormally");
        }
        tracing::info!("Studio unmounted");
    }
}
