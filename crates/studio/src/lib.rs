//! `storyreel-studio` library crate.
//!
//! The book-to-video studio: an input collector, two preference selectors,
//! a voice sample preview and the simulated generation job, all talking
//! over one [`EventBus`](storyreel_events::EventBus). The binary entrypoint
//! lives in `main.rs`.

pub mod collector;
pub mod config;
pub mod notifications;
pub mod preview;
pub mod selector;
pub mod simulator;
pub mod studio;

pub use collector::InputCollector;
pub use config::StudioConfig;
pub use notifications::{Notification, NotificationVariant, Notifier};
pub use preview::{AudioBackend, Playback, SimulatedAudioBackend, VoicePreview};
pub use selector::PreferenceSelector;
pub use simulator::{JobSnapshot, JobStatus, ProgressSimulator};
pub use studio::Studio;
