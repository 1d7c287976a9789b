//! Speech engine capability boundary.
//!
//! The host shell owns the actual recognition/synthesis engines; this core
//! drives them through these traits and consumes their lifecycle events.
//! Binding `None` for an engine models "capability unavailable".

pub mod remote;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::VoiceError;

/// One recognized voice in the synthesis catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub name: String,
    pub lang: String,
}

impl VoiceInfo {
    pub fn new(name: &str, lang: &str) -> Self {
        Self {
            name: name.to_string(),
            lang: lang.to_string(),
        }
    }
}

/// A piece of recognizer output within one result callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptFragment {
    pub text: String,
    /// Final fragments are stable; interim ones are provisional and dropped.
    pub is_final: bool,
}

/// Lifecycle events delivered by the recognition engine.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    Started,
    Result { fragments: Vec<TranscriptFragment> },
    /// Engine error codes follow the web speech vocabulary
    /// ("no-speech", "not-allowed", ...).
    Error { code: String },
    Ended,
}

/// One text-to-speech playback request.
///
/// Carries a fresh id so terminal events from a cancelled utterance can be
/// told apart from those of its replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub id: Uuid,
    pub text: String,
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// Exact voice name, or `None` for the platform default.
    pub voice: Option<String>,
}

/// Per-call overrides for [`Utterance`] construction.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpeakOptions {
    pub rate: Option<f32>,
    pub pitch: Option<f32>,
    pub volume: Option<f32>,
}

/// Lifecycle events delivered by the synthesis engine.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisEvent {
    Started { id: Uuid },
    Ended { id: Uuid },
    Error { id: Uuid, message: String },
    /// The voice catalog changed (it may be empty at startup and populate
    /// asynchronously later).
    VoicesChanged { voices: Vec<VoiceInfo> },
}

/// Dictation engine: single-shot, non-continuous sessions with interim
/// results, driven by start/stop and observed through [`RecognitionEvent`]s.
pub trait SpeechRecognizer: Send + Sync {
    /// Configure the recognition locale for subsequent sessions.
    fn set_language(&self, lang: &str);

    /// Request a new session. May fail synchronously (e.g. a session is
    /// already active); otherwise completion is signalled via events.
    fn start(&self) -> Result<(), VoiceError>;

    /// Request a graceful stop. The terminal `Ended` event still arrives.
    fn stop(&self);
}

/// Playback engine: at most one active utterance, a queryable voice
/// catalog, and engine-level pause state.
pub trait SpeechSynthesizer: Send + Sync {
    /// Current voice catalog; may be empty until `VoicesChanged` fires.
    fn voices(&self) -> Vec<VoiceInfo>;

    /// Begin speaking an utterance.
    fn speak(&self, utterance: &Utterance) -> Result<(), VoiceError>;

    /// Cancel the active utterance, if any.
    fn cancel(&self);

    fn pause(&self);

    fn resume(&self);

    /// Whether the engine itself reports paused playback.
    fn is_paused(&self) -> bool;
}
