//! Recognition (speech-to-text) control.
//!
//! Sessions are single-shot: one `start_listening` runs until the engine's
//! terminal event, and a second call while a session is active toggles it
//! off instead of starting another. Phase flags follow the engine's
//! lifecycle events; the start call only requests a session.

use tracing::{debug, error, info};

use crate::notify::NotifyLevel;
use crate::speech::RecognitionEvent;
use crate::ui::MicState;

use super::VoiceManager;

impl VoiceManager {
    /// Start a dictation session — or stop the one already running.
    pub fn start_listening(&mut self) {
        let Some(recognizer) = self.recognizer.clone() else {
            error!("Recognition requested but no engine is available");
            self.notify(NotifyLevel::Error, "Speech recognition is not supported");
            return;
        };

        if self.recognition.is_active() {
            self.stop_listening();
            return;
        }

        recognizer.set_language(&self.settings.input_language);
        if let Err(e) = recognizer.start() {
            error!("Failed to start recognition: {}", e);
            self.notify(NotifyLevel::Error, "Could not start speech recognition");
        }
    }

    /// Request a graceful stop of the active session. The phase clears on
    /// the engine's `Ended` event, never synchronously.
    pub fn stop_listening(&mut self) {
        let Some(recognizer) = &self.recognizer else {
            return;
        };
        if self.recognition.request_stop() {
            recognizer.stop();
            self.ui.mic.set_state(MicState::Processing);
            info!("Voice recognition stop requested");
        }
    }

    /// Engine lifecycle callback entry point.
    pub fn on_recognition_event(&mut self, event: RecognitionEvent) {
        match event {
            RecognitionEvent::Started => {
                self.recognition.mark_listening();
                self.ui.mic.set_state(MicState::Listening);
                info!("Voice recognition started");
            }
            RecognitionEvent::Result { fragments } => {
                let mut interim = String::new();
                let mut confirmed = String::new();
                for fragment in fragments {
                    if fragment.is_final {
                        confirmed.push_str(&fragment.text);
                    } else {
                        interim.push_str(&fragment.text);
                    }
                }
                // Interim text is provisional and dropped each cycle.
                if !interim.is_empty() {
                    debug!(interim = %interim, "Interim transcript");
                }
                if !confirmed.is_empty() {
                    self.handle_transcript(&confirmed);
                    info!("Recognized: {}", confirmed);
                }
            }
            RecognitionEvent::Error { code } => {
                error!("Speech recognition error: {}", code);
                self.recognition.mark_idle();
                let (level, message) = classify_recognition_error(&code);
                self.notify(level, &message);
                self.show_mic_error();
            }
            RecognitionEvent::Ended => {
                self.recognition.mark_idle();
                self.ui.mic.set_state(MicState::Idle);
                info!("Voice recognition stopped");
            }
        }
    }

    /// Write a confirmed transcript into the dictation target: replace when
    /// the target is empty, append with a separating space otherwise.
    pub fn handle_transcript(&self, text: &str) {
        let existing = self.ui.target.current_text();
        let updated = if existing.trim().is_empty() {
            text.to_string()
        } else {
            format!("{} {}", existing, text)
        };
        self.ui.target.set_text(&updated);
    }

    /// Show the error affordance, reverting to idle after the display
    /// delay unless a new session became active in the meantime.
    fn show_mic_error(&self) {
        self.ui.mic.set_state(MicState::Error);
        let mic = self.ui.mic.clone();
        let machine = self.recognition.clone();
        let delay = self.error_display;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !machine.is_active() {
                mic.set_state(MicState::Idle);
            }
        });
    }
}

/// Map an engine error code to the user-facing notification.
fn classify_recognition_error(code: &str) -> (NotifyLevel, String) {
    match code {
        "no-speech" => (
            NotifyLevel::Warning,
            "No speech was detected".to_string(),
        ),
        "not-allowed" => (
            NotifyLevel::Error,
            "Microphone access was denied".to_string(),
        ),
        other => (
            NotifyLevel::Error,
            format!("Speech recognition error: {}", other),
        ),
    }
}

// ── Tests ───────────────────────────────────────────────────────────
