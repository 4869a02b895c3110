//! Domain building blocks for the StoryReel studio.
//!
//! Everything in this crate is synchronous and free of runtime state:
//! option catalogs, validation, the error taxonomy and the progress math
//! shared by the studio components.

pub mod error;
pub mod frames;
pub mod job_events;
pub mod library;
pub mod preferences;
pub mod story;
pub mod types;
