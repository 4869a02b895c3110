//! Style and voice option catalogs plus preference validation.
//!
//! Each preference kind has a fixed set of option ids, a storage key under
//! which the selected id is persisted, and a default used when nothing (or
//! nothing valid) has been persisted yet.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Storage keys
// ---------------------------------------------------------------------------

/// Storage key holding the selected style id.
pub const STYLE_STORAGE_KEY: &str = "selectedStyle";
/// Storage key holding the selected voice id.
pub const VOICE_STORAGE_KEY: &str = "selectedVoice";

// ---------------------------------------------------------------------------
// Style options
// ---------------------------------------------------------------------------

pub const STYLE_REALISTIC: &str = "realistic";
pub const STYLE_CARTOON: &str = "cartoon";
pub const STYLE_ANIME: &str = "anime";
pub const STYLE_WATERCOLOR: &str = "watercolor";

/// Style used when none has been selected.
pub const DEFAULT_STYLE: &str = STYLE_REALISTIC;

/// A selectable animation style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleOption {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub preview_image: Option<&'static str>,
}

pub const STYLE_OPTIONS: &[StyleOption] = &[
    StyleOption {
        id: STYLE_REALISTIC,
        name: "Realistic",
        description: "Photorealistic visuals with natural lighting and textures",
        preview_image: Some(
            "https://images.unsplash.com/photo-1579546929518-9e396f3cc809?w=400&q=80",
        ),
    },
    StyleOption {
        id: STYLE_CARTOON,
        name: "Cartoon",
        description: "Vibrant colors with bold outlines and playful aesthetics",
        preview_image: Some(
            "https://images.unsplash.com/photo-1560800452-f2d475982b96?w=400&q=80",
        ),
    },
    StyleOption {
        id: STYLE_ANIME,
        name: "Anime",
        description: "Japanese-inspired animation with distinctive visual style",
        preview_image: Some(
            "https://images.unsplash.com/photo-1580477667995-2b94f01c9516?w=400&q=80",
        ),
    },
    StyleOption {
        id: STYLE_WATERCOLOR,
        name: "Watercolor",
        description: "Soft, artistic visuals with a hand-painted appearance",
        preview_image: Some(
            "https://images.unsplash.com/photo-1579783902614-a3fb3927b6a5?w=400&q=80",
        ),
    },
];

// ---------------------------------------------------------------------------
// Voice options
// ---------------------------------------------------------------------------

pub const VOICE_NARRATOR: &str = "narrator";
pub const VOICE_STORYTELLER: &str = "storyteller";
pub const VOICE_DRAMATIC: &str = "dramatic";
pub const VOICE_GENTLE: &str = "gentle";

/// Voice used when none has been selected.
pub const DEFAULT_VOICE: &str = VOICE_NARRATOR;

/// A selectable narration voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoiceOption {
    pub id: &'static str,
    pub name: &'static str,
    pub gender: &'static str,
    pub description: &'static str,
    /// URL of a short audio sample. Voices without one cannot be previewed.
    pub sample_audio: Option<&'static str>,
}

pub const VOICE_OPTIONS: &[VoiceOption] = &[
    VoiceOption {
        id: VOICE_NARRATOR,
        name: "Narrator",
        gender: "Male",
        description: "Deep, authoritative voice perfect for serious narratives",
        sample_audio: Some(
            "https://audio-samples.github.io/samples/mp3/blizzard_biased/sample-1.mp3",
        ),
    },
    VoiceOption {
        id: VOICE_STORYTELLER,
        name: "Storyteller",
        gender: "Female",
        description: "Warm, engaging voice ideal for children's stories",
        sample_audio: Some(
            "https://audio-samples.github.io/samples/mp3/blizzard_biased/sample-2.mp3",
        ),
    },
    VoiceOption {
        id: VOICE_DRAMATIC,
        name: "Dramatic",
        gender: "Male",
        description: "Expressive voice with emotional range for dramatic scenes",
        sample_audio: Some(
            "https://audio-samples.github.io/samples/mp3/blizzard_biased/sample-3.mp3",
        ),
    },
    VoiceOption {
        id: VOICE_GENTLE,
        name: "Gentle",
        gender: "Female",
        description: "Soft, soothing voice for calm and reflective passages",
        sample_audio: Some(
            "https://audio-samples.github.io/samples/mp3/blizzard_biased/sample-4.mp3",
        ),
    },
];

/// Look up a voice option by id.
pub fn find_voice(id: &str) -> Option<&'static VoiceOption> {
    VOICE_OPTIONS.iter().find(|v| v.id == id)
}

/// Look up a style option by id.
pub fn find_style(id: &str) -> Option<&'static StyleOption> {
    STYLE_OPTIONS.iter().find(|s| s.id == id)
}

// ---------------------------------------------------------------------------
// PreferenceKind
// ---------------------------------------------------------------------------

/// The two independently persisted user preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceKind {
    Style,
    Voice,
}

impl PreferenceKind {
    /// Storage key for this kind.
    pub fn storage_key(self) -> &'static str {
        match self {
            PreferenceKind::Style => STYLE_STORAGE_KEY,
            PreferenceKind::Voice => VOICE_STORAGE_KEY,
        }
    }

    /// Option selected when nothing valid is persisted.
    pub fn default_option(self) -> &'static str {
        match self {
            PreferenceKind::Style => DEFAULT_STYLE,
            PreferenceKind::Voice => DEFAULT_VOICE,
        }
    }

    /// All valid option ids for this kind.
    pub fn option_ids(self) -> Vec<&'static str> {
        match self {
            PreferenceKind::Style => STYLE_OPTIONS.iter().map(|s| s.id).collect(),
            PreferenceKind::Voice => VOICE_OPTIONS.iter().map(|v| v.id).collect(),
        }
    }

    /// Whether `option_id` belongs to this kind's option set.
    pub fn is_valid_option(self, option_id: &str) -> bool {
        match self {
            PreferenceKind::Style => find_style(option_id).is_some(),
            PreferenceKind::Voice => find_voice(option_id).is_some(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PreferenceKind::Style => "style",
            PreferenceKind::Voice => "voice",
        }
    }
}

impl std::fmt::Display for PreferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate that `option_id` is a known option for `kind`.
pub fn validate_option(kind: PreferenceKind, option_id: &str) -> Result<(), CoreError> {
    if kind.is_valid_option(option_id) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown {kind} option: '{option_id}'. Valid options: {}",
            kind.option_ids().join(", ")
        )))
    }
}

/// Resolve a persisted value to a usable option id.
///
/// Absent or unrecognized values resolve to the kind's default.
pub fn resolve_persisted(kind: PreferenceKind, persisted: Option<&str>) -> &'static str {
    persisted
        .and_then(|id| match kind {
            PreferenceKind::Style => find_style(id).map(|s| s.id),
            PreferenceKind::Voice => find_voice(id).map(|v| v.id),
        })
        .unwrap_or_else(|| kind.default_option())
}
