//! Voice settings record and settings-panel option building.

use serde::{Deserialize, Serialize};

use crate::speech::VoiceInfo;

/// Sentinel value meaning "use the platform default voice".
pub const DEFAULT_VOICE: &str = "default";

/// User-facing voice preferences, persisted through the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// Locale tag used for dictation *and* playback (e.g. "cs-CZ").
    pub input_language: String,
    /// Synthesis voice name, or the "default" sentinel.
    pub output_voice: String,
    /// Playback rate, typically 0.5–2.0.
    pub output_speed: f32,
    /// Speak assistant responses automatically.
    pub auto_play: bool,
    /// Maximum retained conversation entries.
    pub history_limit: usize,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            input_language: "cs-CZ".to_string(),
            output_voice: DEFAULT_VOICE.to_string(),
            output_speed: 1.0,
            auto_play: false,
            history_limit: 100,
        }
    }
}

/// One entry in the settings panel's voice dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceOption {
    /// Display label, e.g. "Milena (cs-CZ)".
    pub label: String,
    /// Raw voice name carried as the option value.
    pub value: String,
}

/// Build the dropdown options for a voice catalog.
///
/// The synthetic "System default" option always comes first; each real
/// voice displays as "name (lang)" and carries the raw name as its value.
pub fn build_voice_options(voices: &[VoiceInfo]) -> Vec<VoiceOption> {
    let mut options = Vec::with_capacity(voices.len() + 1);
    options.push(VoiceOption {
        label: "System default".to_string(),
        value: DEFAULT_VOICE.to_string(),
    });
    for voice in voices {
        options.push(VoiceOption {
            label: format!("{} ({})", voice.name, voice.lang),
            value: voice.name.clone(),
        });
    }
    options
}

// ── Tests ───────────────────────────────────────────────────────────
