//! The voice manager.
//!
//! Owns the recognition and synthesis state machines, translates engine
//! lifecycle events into state transitions, drives the shell-side UI
//! affordances, and persists settings and conversation history through the
//! backend command boundary. Constructed once at the composition root with
//! injected collaborators — there is no ambient global instance.

pub mod recognition;
pub mod state;
pub mod synthesis;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::backend::VoiceBackend;
use crate::history::ConversationEntry;
use crate::notify::{NotifyLevel, NotifySink};
use crate::settings::{build_voice_options, VoiceSettings};
use crate::speech::{SpeakOptions, SpeechRecognizer, SpeechSynthesizer, VoiceInfo};
use crate::ui::{DictationTarget, MicIndicator, SettingsPanel};

use state::{RecognitionMachine, SynthesisMachine};

/// How long the mic affordance shows the error state before reverting.
pub const ERROR_DISPLAY_DELAY: Duration = Duration::from_secs(2);

/// Shell-side collaborators, injected at construction.
pub struct UiBindings {
    pub notifier: Arc<dyn NotifySink>,
    pub mic: Arc<dyn MicIndicator>,
    pub target: Arc<dyn DictationTarget>,
    pub panel: Arc<dyn SettingsPanel>,
}

pub struct VoiceManager {
    /// `None` models "capability unavailable" on this host.
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    backend: Arc<dyn VoiceBackend>,
    ui: UiBindings,
    settings: VoiceSettings,
    recognition: Arc<RecognitionMachine>,
    synthesis: Arc<SynthesisMachine>,
    /// Id of the utterance between `speak()` and its terminal event.
    current_utterance: Option<Uuid>,
    /// One-shot latch for the asynchronously-arriving voice catalog.
    catalog_armed: bool,
    error_display: Duration,
}

impl VoiceManager {
    pub fn new(
        recognizer: Option<Arc<dyn SpeechRecognizer>>,
        synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
        backend: Arc<dyn VoiceBackend>,
        ui: UiBindings,
    ) -> Self {
        Self {
            recognizer,
            synthesizer,
            backend,
            ui,
            settings: VoiceSettings::default(),
            recognition: Arc::new(RecognitionMachine::new()),
            synthesis: Arc::new(SynthesisMachine::new()),
            current_utterance: None,
            catalog_armed: false,
            error_display: ERROR_DISPLAY_DELAY,
        }
    }

    pub fn settings(&self) -> &VoiceSettings {
        &self.settings
    }

    pub fn is_listening(&self) -> bool {
        self.recognition.is_active()
    }

    pub fn is_speaking(&self) -> bool {
        self.synthesis.is_active()
    }

    fn notify(&self, level: NotifyLevel, message: &str) {
        self.ui.notifier.notify(level, message);
    }

    // ── Settings synchronization ────────────────────────────────────

    /// Fetch settings from the backend, falling back to the default record
    /// so the manager stays usable when the backend is unreachable.
    /// Propagates the resolved locale into the recognition engine.
    pub async fn load_settings(&mut self) {
        match self.backend.get_voice_settings().await {
            Ok(settings) => {
                self.settings = settings;
                info!(settings = ?self.settings, "Voice settings loaded");
            }
            Err(e) => {
                warn!("Failed to load voice settings, using defaults: {}", e);
                self.settings = VoiceSettings::default();
            }
        }
        if let Some(recognizer) = &self.recognizer {
            recognizer.set_language(&self.settings.input_language);
        }
    }

    /// Persist-then-commit: the in-memory record and the recognizer locale
    /// change only after the backend accepted the save.
    pub async fn update_settings(&mut self, new_settings: VoiceSettings) {
        match self.backend.save_voice_settings(&new_settings).await {
            Ok(()) => {
                self.settings = new_settings;
                if let Some(recognizer) = &self.recognizer {
                    recognizer.set_language(&self.settings.input_language);
                }
                info!("Voice settings updated");
                self.notify(NotifyLevel::Success, "Settings saved");
            }
            Err(e) => {
                error!("Failed to save voice settings: {}", e);
                self.notify(NotifyLevel::Error, "Could not save settings");
            }
        }
    }

    /// Settings panel opened: push the current record into the form and
    /// populate the voice dropdown.
    ///
    /// The catalog may still be empty at this point and arrive later via a
    /// `VoicesChanged` event; in that case a one-shot population is armed.
    /// Re-opening the panel before the catalog lands arms it at most once.
    pub fn open_settings_panel(&mut self) {
        self.ui.panel.show_settings(&self.settings);

        let Some(synthesizer) = &self.synthesizer else {
            return;
        };
        let voices = synthesizer.voices();
        if voices.is_empty() {
            self.catalog_armed = true;
            debug!("Voice catalog empty, waiting for it to populate");
        } else {
            self.catalog_armed = false;
            self.populate_voice_panel(&voices);
        }
    }

    /// Engine reported a (possibly first) voice catalog. Fires the armed
    /// population exactly once.
    pub(crate) fn on_voices_changed(&mut self, voices: Vec<VoiceInfo>) {
        if !self.catalog_armed {
            return;
        }
        self.catalog_armed = false;
        self.populate_voice_panel(&voices);
    }

    fn populate_voice_panel(&self, voices: &[VoiceInfo]) {
        let options = build_voice_options(voices);
        self.ui
            .panel
            .show_voice_options(&options, &self.settings.output_voice);
    }

    // ── Conversation history ────────────────────────────────────────

    /// Persist one completed exchange. Failures are logged and swallowed —
    /// history must never interrupt the conversation flow.
    pub async fn save_conversation(
        &self,
        user_input: &str,
        assistant_response: &str,
        voice_used: bool,
    ) {
        let entry = ConversationEntry::new(user_input, assistant_response, voice_used);
        match self.backend.save_conversation(entry).await {
            Ok(()) => debug!("Conversation saved"),
            Err(e) => error!("Failed to save conversation: {}", e),
        }
    }

    pub async fn load_conversations(&self) -> Vec<ConversationEntry> {
        match self.backend.load_conversations().await {
            Ok(entries) => {
                info!(count = entries.len(), "Conversations loaded");
                entries
            }
            Err(e) => {
                error!("Failed to load conversations: {}", e);
                Vec::new()
            }
        }
    }

    /// Destructive; the shell confirms with the user before sending this.
    pub async fn clear_conversations(&self) {
        match self.backend.clear_conversations().await {
            Ok(()) => {
                info!("Conversation history cleared");
                self.notify(NotifyLevel::Success, "Conversation history cleared");
            }
            Err(e) => {
                error!("Failed to clear conversations: {}", e);
                self.notify(NotifyLevel::Error, "Could not clear conversation history");
            }
        }
    }

    /// A voice-driven exchange completed: record it and, when auto-play is
    /// enabled, narrate the response.
    pub async fn handle_assistant_response(
        &mut self,
        user_input: &str,
        text: &str,
        voice_used: bool,
    ) {
        self.save_conversation(user_input, text, voice_used).await;
        if self.settings.auto_play {
            self.speak(text, SpeakOptions::default());
        }
    }
}

// ── Test rig ────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod testutil {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::error::VoiceError;
    use crate::settings::VoiceOption;
    use crate::speech::Utterance;
    use crate::ui::MicState;

    #[derive(Default)]
    pub struct MockRecognizer {
        pub language: Mutex<String>,
        pub starts: Mutex<u32>,
        pub stops: Mutex<u32>,
        pub fail_start: AtomicBool,
    }

    impl SpeechRecognizer for MockRecognizer {
        fn set_language(&self, lang: &str) {
            *self.language.lock().unwrap() = lang.to_string();
        }

        fn start(&self) -> Result<(), VoiceError> {
            if self.fail_start.load(Ordering::SeqCst) {
                return Err(VoiceError::Engine("start rejected".to_string()));
            }
            *self.starts.lock().unwrap() += 1;
            Ok(())
        }

        fn stop(&self) {
            *self.stops.lock().unwrap() += 1;
        }
    }

    #[derive(Default)]
    pub struct MockSynthesizer {
        pub catalog: Mutex<Vec<VoiceInfo>>,
        pub spoken: Mutex<Vec<Utterance>>,
        pub cancels: Mutex<u32>,
        pub paused: AtomicBool,
    }

    impl MockSynthesizer {
        pub fn set_voices(&self, voices: Vec<VoiceInfo>) {
            *self.catalog.lock().unwrap() = voices;
        }

        pub fn last_utterance(&self) -> Utterance {
            self.spoken.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl SpeechSynthesizer for MockSynthesizer {
        fn voices(&self) -> Vec<VoiceInfo> {
            self.catalog.lock().unwrap().clone()
        }

        fn speak(&self, utterance: &Utterance) -> Result<(), VoiceError> {
            self.spoken.lock().unwrap().push(utterance.clone());
            Ok(())
        }

        fn cancel(&self) {
            *self.cancels.lock().unwrap() += 1;
            self.paused.store(false, Ordering::SeqCst);
        }

        fn pause(&self) {
            self.paused.store(true, Ordering::SeqCst);
        }

        fn resume(&self) {
            self.paused.store(false, Ordering::SeqCst);
        }

        fn is_paused(&self) -> bool {
            self.paused.load(Ordering::SeqCst)
        }
    }

    #[derive(Default)]
    pub struct RecordingNotifier(pub Mutex<Vec<(NotifyLevel, String)>>);

    impl NotifySink for RecordingNotifier {
        fn notify(&self, level: NotifyLevel, message: &str) {
            self.0.lock().unwrap().push((level, message.to_string()));
        }
    }

    #[derive(Default)]
    pub struct RecordingMic(pub Mutex<Vec<MicState>>);

    impl MicIndicator for RecordingMic {
        fn set_state(&self, state: MicState) {
            self.0.lock().unwrap().push(state);
        }
    }

    #[derive(Default)]
    pub struct FakeTarget(pub Mutex<String>);

    impl DictationTarget for FakeTarget {
        fn current_text(&self) -> String {
            self.0.lock().unwrap().clone()
        }

        fn set_text(&self, text: &str) {
            *self.0.lock().unwrap() = text.to_string();
        }
    }

    #[derive(Default)]
    pub struct RecordingPanel {
        pub settings_shown: Mutex<Vec<VoiceSettings>>,
        pub options_shown: Mutex<Vec<(Vec<VoiceOption>, String)>>,
    }

    impl SettingsPanel for RecordingPanel {
        fn show_settings(&self, settings: &VoiceSettings) {
            self.settings_shown.lock().unwrap().push(settings.clone());
        }

        fn show_voice_options(&self, options: &[VoiceOption], selected: &str) {
            self.options_shown
                .lock()
                .unwrap()
                .push((options.to_vec(), selected.to_string()));
        }
    }

    #[derive(Default)]
    pub struct MockBackend {
        pub stored_settings: Mutex<Option<VoiceSettings>>,
        pub entries: Mutex<Vec<ConversationEntry>>,
        pub fail_get_settings: AtomicBool,
        pub fail_save_settings: AtomicBool,
        pub fail_save_conversation: AtomicBool,
        pub fail_load_conversations: AtomicBool,
        pub fail_clear: AtomicBool,
    }

    fn rejected() -> VoiceError {
        VoiceError::Backend("rejected".to_string())
    }

    #[async_trait]
    impl VoiceBackend for MockBackend {
        async fn get_voice_settings(&self) -> Result<VoiceSettings, VoiceError> {
            if self.fail_get_settings.load(Ordering::SeqCst) {
                return Err(rejected());
            }
            Ok(self
                .stored_settings
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_default())
        }

        async fn save_voice_settings(&self, settings: &VoiceSettings) -> Result<(), VoiceError> {
            if self.fail_save_settings.load(Ordering::SeqCst) {
                return Err(rejected());
            }
            *self.stored_settings.lock().unwrap() = Some(settings.clone());
            Ok(())
        }

        async fn save_conversation(&self, entry: ConversationEntry) -> Result<(), VoiceError> {
            if self.fail_save_conversation.load(Ordering::SeqCst) {
                return Err(rejected());
            }
            self.entries.lock().unwrap().push(entry);
            Ok(())
        }

        async fn load_conversations(&self) -> Result<Vec<ConversationEntry>, VoiceError> {
            if self.fail_load_conversations.load(Ordering::SeqCst) {
                return Err(rejected());
            }
            Ok(self.entries.lock().unwrap().clone())
        }

        async fn clear_conversations(&self) -> Result<(), VoiceError> {
            if self.fail_clear.load(Ordering::SeqCst) {
                return Err(rejected());
            }
            self.entries.lock().unwrap().clear();
            Ok(())
        }
    }

    /// A manager wired to mocks, with handles kept for assertions.
    pub struct Rig {
        pub manager: VoiceManager,
        pub recognizer: Arc<MockRecognizer>,
        pub synthesizer: Arc<MockSynthesizer>,
        pub notifier: Arc<RecordingNotifier>,
        pub mic: Arc<RecordingMic>,
        pub target: Arc<FakeTarget>,
        pub panel: Arc<RecordingPanel>,
        pub backend: Arc<MockBackend>,
    }

    impl Rig {
        pub fn new() -> Self {
            Self::build(true, true)
        }

        pub fn without_recognizer() -> Self {
            Self::build(false, true)
        }

        pub fn without_synthesizer() -> Self {
            Self::build(true, false)
        }

        fn build(with_recognizer: bool, with_synthesizer: bool) -> Self {
            let recognizer = Arc::new(MockRecognizer::default());
            let synthesizer = Arc::new(MockSynthesizer::default());
            let notifier = Arc::new(RecordingNotifier::default());
            let mic = Arc::new(RecordingMic::default());
            let target = Arc::new(FakeTarget::default());
            let panel = Arc::new(RecordingPanel::default());
            let backend = Arc::new(MockBackend::default());

            let manager = VoiceManager::new(
                with_recognizer.then(|| recognizer.clone() as Arc<dyn SpeechRecognizer>),
                with_synthesizer.then(|| synthesizer.clone() as Arc<dyn SpeechSynthesizer>),
                backend.clone(),
                UiBindings {
                    notifier: notifier.clone(),
                    mic: mic.clone(),
                    target: target.clone(),
                    panel: panel.clone(),
                },
            );

            Self {
                manager,
                recognizer,
                synthesizer,
                notifier,
                mic,
                target,
                panel,
                backend,
            }
        }

        pub fn last_notification(&self) -> (NotifyLevel, String) {
            self.notifier.0.lock().unwrap().last().cloned().unwrap()
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────
