//! IPC-backed speech engines.
//!
//! The real engines live in the host shell's webview; these implementations
//! turn trait calls into outbound engine-control events. Lifecycle
//! callbacks come back as shell commands and are routed to the manager by
//! the main loop, which also keeps the synthesizer's voice-catalog cache
//! current so `voices()` stays a synchronous query.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::VoiceError;
use crate::ipc::bridge::EventSink;
use crate::ipc::ShellEvent;

use super::{SpeechRecognizer, SpeechSynthesizer, Utterance, VoiceInfo};

/// Session parameters for every recognition start: one-shot dictation
/// with interim results and a single alternative.
const CONTINUOUS: bool = false;
const INTERIM_RESULTS: bool = true;
const MAX_ALTERNATIVES: u32 = 1;

pub struct RemoteRecognizer {
    sink: Arc<dyn EventSink>,
    language: Mutex<String>,
}

impl RemoteRecognizer {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            language: Mutex::new(String::new()),
        }
    }
}

impl SpeechRecognizer for RemoteRecognizer {
    fn set_language(&self, lang: &str) {
        *self.language.lock().expect("language poisoned") = lang.to_string();
    }

    fn start(&self) -> Result<(), VoiceError> {
        let language = self.language.lock().expect("language poisoned").clone();
        self.sink.emit(&ShellEvent::StartRecognition {
            language,
            continuous: CONTINUOUS,
            interim_results: INTERIM_RESULTS,
            max_alternatives: MAX_ALTERNATIVES,
        });
        Ok(())
    }

    fn stop(&self) {
        self.sink.emit(&ShellEvent::StopRecognition {});
    }
}

pub struct RemoteSynthesizer {
    sink: Arc<dyn EventSink>,
    voices: Mutex<Vec<VoiceInfo>>,
    paused: AtomicBool,
}

impl RemoteSynthesizer {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            voices: Mutex::new(Vec::new()),
            paused: AtomicBool::new(false),
        }
    }

    /// Replace the cached voice catalog (called on `voices_changed`).
    pub fn set_voices(&self, voices: Vec<VoiceInfo>) {
        *self.voices.lock().expect("voices poisoned") = voices;
    }
}

impl SpeechSynthesizer for RemoteSynthesizer {
    fn voices(&self) -> Vec<VoiceInfo> {
        self.voices.lock().expect("voices poisoned").clone()
    }

    fn speak(&self, utterance: &Utterance) -> Result<(), VoiceError> {
        self.paused.store(false, Ordering::Release);
        self.sink.emit(&ShellEvent::SpeakUtterance {
            id: utterance.id,
            text: utterance.text.clone(),
            lang: utterance.lang.clone(),
            rate: utterance.rate,
            pitch: utterance.pitch,
            volume: utterance.volume,
            voice: utterance.voice.clone(),
        });
        Ok(())
    }

    fn cancel(&self) {
        self.paused.store(false, Ordering::Release);
        self.sink.emit(&ShellEvent::CancelSpeech {});
    }

    fn pause(&self) {
        self.paused.store(true, Ordering::Release);
        self.sink.emit(&ShellEvent::PauseSpeech {});
    }

    fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.sink.emit(&ShellEvent::ResumeSpeech {});
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    struct Collected(Mutex<Vec<ShellEvent>>);

    impl EventSink for Collected {
        fn emit(&self, event: &ShellEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    fn sink() -> Arc<Collected> {
        Arc::new(Collected(Mutex::new(Vec::new())))
    }

    #[test]
    fn start_carries_locale_and_session_config() {
        let sink = sink();
        let recognizer = RemoteRecognizer::new(sink.clone());
        recognizer.set_language("cs-CZ");
        recognizer.start().unwrap();

        let events = sink.0.lock().unwrap();
        assert_eq!(
            events[0],
            ShellEvent::StartRecognition {
                language: "cs-CZ".to_string(),
                continuous: false,
                interim_results: true,
                max_alternatives: 1,
            }
        );
    }

    #[test]
    fn pause_state_follows_control_calls() {
        let synthesizer = RemoteSynthesizer::new(sink());
        assert!(!synthesizer.is_paused());
        synthesizer.pause();
        assert!(synthesizer.is_paused());
        synthesizer.resume();
        assert!(!synthesizer.is_paused());

        synthesizer.pause();
        synthesizer.cancel();
        assert!(!synthesizer.is_paused());
    }

    #[test]
    fn catalog_cache_replaces_wholesale() {
        let synthesizer = RemoteSynthesizer::new(sink());
        assert!(synthesizer.voices().is_empty());

        synthesizer.set_voices(vec![VoiceInfo::new("Aria", "en-US")]);
        assert_eq!(synthesizer.voices().len(), 1);

        synthesizer.set_voices(vec![VoiceInfo::new("Milena", "cs-CZ")]);
        let voices = synthesizer.voices();
        assert_eq!(voices.len(), 1);
        assert_eq!(voices[0].name, "Milena");
    }
}
