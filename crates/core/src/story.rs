//! Story text submitted for generation.

use crate::error::CoreError;

/// Excerpt loaded by the "Load Sample" action.
pub const SAMPLE_STORY_TEXT: &str = "It was a bright cold day in April, and the clocks were striking thirteen. Winston Smith, his chin nuzzled into his breast in an effort to escape the vile wind, slipped quickly through the glass doors of Victory Mansions, though not quickly enough to prevent a swirl of gritty dust from entering along with him.";

/// Characters of story text included in job-start log lines.
pub const LOG_PREVIEW_CHARS: usize = 50;

/// Validate that story text is non-blank after trimming.
pub fn validate_story_text(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation(
            "Please enter some text to generate a video.".to_string(),
        ));
    }
    Ok(())
}

/// First [`LOG_PREVIEW_CHARS`] characters of `text`, respecting char
/// boundaries.
pub fn log_preview(text: &str) -> &str {
    match text.char_indices().nth(LOG_PREVIEW_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
