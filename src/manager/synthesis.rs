//! Synthesis (text-to-speech) control.
//!
//! At most one utterance is ever active: a new `speak` cancels the current
//! one (replace, never queue). Lifecycle events are keyed by utterance id
//! so the terminal event of a cancelled utterance cannot disturb the state
//! of its replacement.

use tracing::{debug, error, info};
use uuid::Uuid;

use crate::notify::NotifyLevel;
use crate::settings::DEFAULT_VOICE;
use crate::speech::{SpeakOptions, SynthesisEvent, Utterance, VoiceInfo};

use super::VoiceManager;

impl VoiceManager {
    /// Speak `text`, replacing any utterance already in flight.
    pub fn speak(&mut self, text: &str, options: SpeakOptions) {
        let Some(synthesizer) = self.synthesizer.clone() else {
            error!("Synthesis requested but no engine is available");
            self.notify(NotifyLevel::Error, "Speech synthesis is not supported");
            return;
        };

        if self.current_utterance.is_some() {
            self.cancel_current();
        }

        let utterance = self.build_utterance(text, options, &synthesizer.voices());
        let id = utterance.id;
        if let Err(e) = synthesizer.speak(&utterance) {
            error!("Failed to start utterance: {}", e);
            self.notify(NotifyLevel::Error, "Voice playback failed");
            return;
        }
        self.current_utterance = Some(id);
        debug!(%id, "Utterance dispatched");
    }

    /// Cancel the active utterance. No-op while idle.
    pub fn stop_speaking(&mut self) {
        if self.synthesis.is_active() {
            self.cancel_current();
            info!("Speech playback cancelled");
        }
    }

    /// Pause playback. Only valid while speaking.
    pub fn pause_speaking(&self) {
        let Some(synthesizer) = &self.synthesizer else {
            return;
        };
        if self.synthesis.pause() {
            synthesizer.pause();
            info!("Speech playback paused");
        }
    }

    /// Resume playback. Only valid while the engine itself reports paused.
    pub fn resume_speaking(&self) {
        let Some(synthesizer) = &self.synthesizer else {
            return;
        };
        if synthesizer.is_paused() {
            synthesizer.resume();
            self.synthesis.resume();
            info!("Speech playback resumed");
        }
    }

    /// Engine lifecycle callback entry point. Events for anything but the
    /// current utterance are stale leftovers of a cancellation.
    pub fn on_synthesis_event(&mut self, event: SynthesisEvent) {
        match event {
            SynthesisEvent::Started { id } => {
                if self.current_utterance == Some(id) {
                    self.synthesis.mark_speaking();
                    info!(%id, "Started speaking");
                } else {
                    debug!(%id, "Ignoring start of a cancelled utterance");
                }
            }
            SynthesisEvent::Ended { id } => {
                if self.current_utterance == Some(id) {
                    self.synthesis.mark_idle();
                    self.current_utterance = None;
                    info!(%id, "Finished speaking");
                } else {
                    debug!(%id, "Ignoring end of a cancelled utterance");
                }
            }
            SynthesisEvent::Error { id, message } => {
                if self.current_utterance == Some(id) {
                    self.synthesis.mark_idle();
                    self.current_utterance = None;
                    error!(%id, "Speech synthesis error: {}", message);
                    self.notify(NotifyLevel::Error, "Voice playback failed");
                } else {
                    debug!(%id, "Ignoring error of a cancelled utterance");
                }
            }
            SynthesisEvent::VoicesChanged { voices } => {
                self.on_voices_changed(voices);
            }
        }
    }

    /// Caller-confirmed cancellation: the engine is told to cancel and the
    /// phase clears immediately; the utterance's late terminal event is
    /// then ignored by id.
    fn cancel_current(&mut self) {
        if let Some(synthesizer) = &self.synthesizer {
            synthesizer.cancel();
        }
        self.synthesis.mark_idle();
        self.current_utterance = None;
    }

    /// Build the utterance from per-call options and settings defaults.
    /// Playback deliberately shares the dictation locale.
    fn build_utterance(&self, text: &str, options: SpeakOptions, voices: &[VoiceInfo]) -> Utterance {
        let voice = if self.settings.output_voice != DEFAULT_VOICE {
            let found = voices
                .iter()
                .find(|v| v.name == self.settings.output_voice);
            if found.is_none() {
                debug!(
                    voice = %self.settings.output_voice,
                    "Configured voice not in catalog, using platform default"
                );
            }
            found.map(|v| v.name.clone())
        } else {
            None
        };

        Utterance {
            id: Uuid::new_v4(),
            text: text.to_string(),
            lang: self.settings.input_language.clone(),
            rate: options.rate.unwrap_or(self.settings.output_speed),
            pitch: options.pitch.unwrap_or(1.0),
            volume: options.volume.unwrap_or(1.0),
            voice,
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::super::testutil::Rig;
    use super::*;
    use crate::settings::VoiceSettings;
    use crate::speech::SpeechSynthesizer;

    #[tokio::test]
    async fn speak_without_engine_notifies_error() {
        let mut rig = Rig::without_synthesizer();
        rig.manager.speak("hello", SpeakOptions::default());
        assert_eq!(rig.last_notification().0, NotifyLevel::Error);
        assert!(!rig.manager.is_speaking());
    }

    #[tokio::test]
    async fn utterance_defaults_come_from_settings() {
        let mut rig = Rig::new();
        rig.manager
            .update_settings(VoiceSettings {
                input_language: "en-GB".to_string(),
                output_speed: 1.4,
                ..Default::default()
            })
            .await;

        rig.manager.speak("hello", SpeakOptions::default());

        let utterance = rig.synthesizer.last_utterance();
        assert_eq!(utterance.lang, "en-GB");
        assert_eq!(utterance.rate, 1.4);
        assert_eq!(utterance.pitch, 1.0);
        assert_eq!(utterance.volume, 1.0);
        assert_eq!(utterance.voice, None);
    }

    #[tokio::test]
    async fn per_call_options_override_settings() {
        let mut rig = Rig::new();
        rig.manager.speak(
            "hello",
            SpeakOptions {
                rate: Some(0.7),
                pitch: Some(1.2),
                volume: Some(0.5),
            },
        );

        let utterance = rig.synthesizer.last_utterance();
        assert_eq!(utterance.rate, 0.7);
        assert_eq!(utterance.pitch, 1.2);
        assert_eq!(utterance.volume, 0.5);
    }

    #[tokio::test]
    async fn configured_voice_binds_by_exact_name() {
        let mut rig = Rig::new();
        rig.synthesizer.set_voices(vec![
            VoiceInfo::new("Milena", "cs-CZ"),
            VoiceInfo::new("Milena Premium", "cs-CZ"),
        ]);
        rig.manager
            .update_settings(VoiceSettings {
                output_voice: "Milena".to_string(),
                ..Default::default()
            })
            .await;

        rig.manager.speak("ahoj", SpeakOptions::default());
        assert_eq!(
            rig.synthesizer.last_utterance().voice,
            Some("Milena".to_string())
        );
    }

    #[tokio::test]
    async fn unknown_voice_falls_back_to_platform_default() {
        let mut rig = Rig::new();
        rig.synthesizer
            .set_voices(vec![VoiceInfo::new("Aria", "en-US")]);
        rig.manager
            .update_settings(VoiceSettings {
                output_voice: "Ghost".to_string(),
                ..Default::default()
            })
            .await;

        rig.manager.speak("hello", SpeakOptions::default());
        assert_eq!(rig.synthesizer.last_utterance().voice, None);
        // Silent fallback: no notification beyond the settings-saved one.
        assert_eq!(rig.notifier.0.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn speak_replaces_active_utterance() {
        let mut rig = Rig::new();

        rig.manager.speak("first", SpeakOptions::default());
        let first = rig.synthesizer.last_utterance();
        rig.manager
            .on_synthesis_event(SynthesisEvent::Started { id: first.id });
        assert!(rig.manager.is_speaking());

        rig.manager.speak("second", SpeakOptions::default());
        let second = rig.synthesizer.last_utterance();
        assert_eq!(*rig.synthesizer.cancels.lock().unwrap(), 1);
        assert_ne!(first.id, second.id);

        rig.manager
            .on_synthesis_event(SynthesisEvent::Started { id: second.id });
        // The cancelled utterance's terminal event arrives late and is inert.
        rig.manager
            .on_synthesis_event(SynthesisEvent::Ended { id: first.id });
        assert!(rig.manager.is_speaking());

        rig.manager
            .on_synthesis_event(SynthesisEvent::Ended { id: second.id });
        assert!(!rig.manager.is_speaking());
    }

    #[tokio::test]
    async fn stop_speaking_is_idempotent() {
        let mut rig = Rig::new();
        rig.manager.stop_speaking();
        assert_eq!(*rig.synthesizer.cancels.lock().unwrap(), 0);

        rig.manager.speak("hello", SpeakOptions::default());
        let id = rig.synthesizer.last_utterance().id;
        rig.manager.on_synthesis_event(SynthesisEvent::Started { id });

        rig.manager.stop_speaking();
        assert_eq!(*rig.synthesizer.cancels.lock().unwrap(), 1);
        assert!(!rig.manager.is_speaking());

        rig.manager.stop_speaking();
        assert_eq!(*rig.synthesizer.cancels.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn pause_only_while_speaking_resume_only_while_paused() {
        let mut rig = Rig::new();

        // Not speaking: both are no-ops.
        rig.manager.pause_speaking();
        assert!(!rig.synthesizer.is_paused());
        rig.manager.resume_speaking();

        rig.manager.speak("hello", SpeakOptions::default());
        let id = rig.synthesizer.last_utterance().id;
        rig.manager.on_synthesis_event(SynthesisEvent::Started { id });

        rig.manager.pause_speaking();
        assert!(rig.synthesizer.is_paused());

        rig.manager.resume_speaking();
        assert!(!rig.synthesizer.is_paused());
        assert!(rig.manager.is_speaking());
    }

    #[tokio::test]
    async fn synthesis_error_clears_state_and_notifies() {
        let mut rig = Rig::new();
        rig.manager.speak("hello", SpeakOptions::default());
        let id = rig.synthesizer.last_utterance().id;
        rig.manager.on_synthesis_event(SynthesisEvent::Started { id });

        rig.manager.on_synthesis_event(SynthesisEvent::Error {
            id,
            message: "synthesis-failed".to_string(),
        });
        assert!(!rig.manager.is_speaking());
        assert_eq!(rig.last_notification().0, NotifyLevel::Error);
    }

    #[tokio::test]
    async fn dictation_and_playback_are_independent() {
        let mut rig = Rig::new();

        rig.manager.speak("narrating", SpeakOptions::default());
        let id = rig.synthesizer.last_utterance().id;
        rig.manager.on_synthesis_event(SynthesisEvent::Started { id });

        rig.manager.start_listening();
        rig.manager
            .on_recognition_event(crate::speech::RecognitionEvent::Started);

        assert!(rig.manager.is_speaking());
        assert!(rig.manager.is_listening());

        rig.manager
            .on_recognition_event(crate::speech::RecognitionEvent::Ended);
        assert!(rig.manager.is_speaking());
        assert!(!rig.manager.is_listening());
    }

    #[tokio::test]
    async fn resume_follows_engine_reported_pause() {
        // Resume is gated on what the engine reports, not on our phase.
        let mut rig = Rig::new();
        rig.synthesizer.paused.store(true, Ordering::SeqCst);
        rig.manager.resume_speaking();
        assert!(!rig.synthesizer.is_paused());
    }
}
