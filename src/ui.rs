//! Shell-side UI affordances the voice core drives.
//!
//! All three traits are implemented by the IPC shell bridge in production
//! and by recording fakes in tests.

use serde::{Deserialize, Serialize};

use crate::settings::{VoiceOption, VoiceSettings};

/// Visual states of the microphone affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MicState {
    Idle,
    Listening,
    /// A session is still active but a graceful stop was requested.
    Processing,
    /// Shown transiently after a recognition error; auto-reverts to idle.
    Error,
}

impl std::fmt::Display for MicState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Listening => write!(f, "listening"),
            Self::Processing => write!(f, "processing"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// The microphone button (or equivalent) reflecting recognition state.
pub trait MicIndicator: Send + Sync {
    fn set_state(&self, state: MicState);
}

/// The text input that dictation writes into.
///
/// `set_text` implies a downstream input-change dispatch so dependent UI
/// reacts to the mutation.
pub trait DictationTarget: Send + Sync {
    fn current_text(&self) -> String;
    fn set_text(&self, text: &str);
}

/// The voice section of the settings panel.
pub trait SettingsPanel: Send + Sync {
    /// Push the current settings record into the form controls.
    fn show_settings(&self, settings: &VoiceSettings);

    /// Replace the voice dropdown contents and select `selected` if present.
    fn show_voice_options(&self, options: &[VoiceOption], selected: &str);
}
