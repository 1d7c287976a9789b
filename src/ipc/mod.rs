//! IPC protocol types for communication with the host shell.
//!
//! Events use `{"event": "<name>", "data": {...}}` format (core -> shell).
//! Commands use `{"command": "<name>", ...}` format (shell -> core).
//!
//! The shell forwards its speech engines' lifecycle callbacks as commands;
//! the core answers with engine control requests and UI updates as events.

pub mod bridge;
pub mod shell;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::history::ConversationEntry;
use crate::notify::NotifyLevel;
use crate::settings::{VoiceOption, VoiceSettings};
use crate::speech::{TranscriptFragment, VoiceInfo};
use crate::ui::MicState;

// ---------------------------------------------------------------------------
// Commands: shell -> core (stdin)
// ---------------------------------------------------------------------------

/// All commands received from the shell via stdin as JSON lines.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command")]
#[serde(rename_all = "snake_case")]
pub enum ShellCommand {
    /// Capability handshake; must arrive before any other command.
    Init {
        #[serde(default)]
        recognition_supported: bool,
        #[serde(default)]
        synthesis_supported: bool,
    },

    // User triggers
    ToggleDictation {},
    StopDictation {},
    Speak {
        text: String,
        #[serde(default)]
        rate: Option<f32>,
        #[serde(default)]
        pitch: Option<f32>,
        #[serde(default)]
        volume: Option<f32>,
    },
    StopSpeaking {},
    PauseSpeaking {},
    ResumeSpeaking {},

    // Settings
    GetSettings {},
    UpdateSettings { settings: VoiceSettings },
    /// Settings panel opened; push settings + voice options.
    OpenSettings {},

    GetStatus {},

    // History
    AssistantResponse {
        user_input: String,
        text: String,
        #[serde(default)]
        voice_used: bool,
    },
    SaveConversation {
        user_input: String,
        assistant_response: String,
        #[serde(default)]
        voice_used: bool,
    },
    LoadConversations {},
    ClearConversations {},

    /// Mirror of the dictation target's current content.
    InputSync { text: String },

    // Recognition engine lifecycle callbacks, forwarded by the shell
    RecognitionStarted {},
    RecognitionResult { fragments: Vec<TranscriptFragment> },
    RecognitionError { code: String },
    RecognitionEnded {},

    // Synthesis engine lifecycle callbacks
    SynthesisStarted { id: Uuid },
    SynthesisEnded { id: Uuid },
    SynthesisError {
        id: Uuid,
        #[serde(default)]
        message: String,
    },
    VoicesChanged { voices: Vec<VoiceInfo> },

    Ping {},
    Stop {},
}

// ---------------------------------------------------------------------------
// Events: core -> shell (stdout)
// ---------------------------------------------------------------------------

/// All events emitted to the shell via stdout as JSON lines.
///
/// Serialized as `{"event": "<variant>", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum ShellEvent {
    Starting {},
    Ready {
        recognition: bool,
        synthesis: bool,
    },
    Pong {},
    Stopping {},

    // Engine control requests, executed by the shell on its engines
    StartRecognition {
        language: String,
        continuous: bool,
        interim_results: bool,
        max_alternatives: u32,
    },
    StopRecognition {},
    SpeakUtterance {
        id: Uuid,
        text: String,
        lang: String,
        rate: f32,
        pitch: f32,
        volume: f32,
        #[serde(skip_serializing_if = "Option::is_none")]
        voice: Option<String>,
    },
    CancelSpeech {},
    PauseSpeech {},
    ResumeSpeech {},

    /// Current engine-reported state snapshot.
    Status {
        listening: bool,
        speaking: bool,
    },

    // UI updates
    MicState { state: MicState },
    InputText { text: String },
    Notification {
        level: NotifyLevel,
        message: String,
    },
    Settings { settings: VoiceSettings },
    VoiceOptions {
        options: Vec<VoiceOption>,
        selected: String,
    },
    Conversations { entries: Vec<ConversationEntry> },
}

// ── Tests ───────────────────────────────────────────────────────────
