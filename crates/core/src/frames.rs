//! Placeholder frame catalogue and progress math for simulated generation.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Frames revealed by one simulated job.
pub const TOTAL_FRAMES: u32 = 10;

/// Placeholder frames, revealed in order.
pub const PLACEHOLDER_FRAMES: &[&str] = &[
    "https://images.unsplash.com/photo-1579546929518-9e396f3cc809?w=800&q=80",
    "https://images.unsplash.com/photo-1560800452-f2d475982b96?w=800&q=80",
    "https://images.unsplash.com/photo-1580477667995-2b94f01c9516?w=800&q=80",
    "https://images.unsplash.com/photo-1579783902614-a3fb3927b6a5?w=800&q=80",
    "https://images.unsplash.com/photo-1557682250-33bd709cbe85?w=800&q=80",
    "https://images.unsplash.com/photo-1556740758-90de374c12ad?w=800&q=80",
    "https://images.unsplash.com/photo-1557682224-5b8590cd9ec5?w=800&q=80",
    "https://images.unsplash.com/photo-1557682260-96773eb01377?w=800&q=80",
    "https://images.unsplash.com/photo-1557683316-973673baf926?w=800&q=80",
    "https://images.unsplash.com/photo-1558655146-d09347e92766?w=800&q=80",
];

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Completion percentage after `frame_count` of `total_frames` ticks.
///
/// Rounds half up, is clamped to 100, and is exactly 100 once
/// `frame_count == total_frames`. A zero total reports 100.
pub fn progress_percent(frame_count: u32, total_frames: u32) -> u8 {
    if total_frames == 0 {
        return 100;
    }
    let count = u64::from(frame_count.min(total_frames));
    let total = u64::from(total_frames);
    ((count * 100 + total / 2) / total) as u8
}

// ---------------------------------------------------------------------------
// Frame catalogue
// ---------------------------------------------------------------------------

/// Supplies the frame references a job reveals.
///
/// Receives the style and voice read at job start, so a catalogue may vary
/// its frames per preference. The default catalogue does not.
pub trait FrameCatalog: Send + Sync {
    fn frames_for(&self, style: &str, voice: &str) -> Vec<String>;
}

/// The fixed placeholder set, regardless of preferences.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderFrames;

impl FrameCatalog for PlaceholderFrames {
    fn frames_for(&self, _style: &str, _voice: &str) -> Vec<String> {
        PLACEHOLDER_FRAMES.iter().map(|f| (*f).to_string()).collect()
    }
}

/// Frame revealed on tick `tick` (1-based), cycling through `frames`.
///
/// Returns `None` for tick 0 or an empty catalogue.
pub fn frame_for_tick(frames: &[String], tick: u32) -> Option<&str> {
    if tick == 0 || frames.is_empty() {
        return None;
    }
    let idx = (tick as usize - 1) % frames.len();
    Some(frames[idx].as_str())
}
