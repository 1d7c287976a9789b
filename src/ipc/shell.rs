//! Shell bridge: the UI trait implementations that relay over IPC.
//!
//! One struct implements every shell-side affordance the manager drives —
//! notifications, the mic indicator, the dictation target and the settings
//! panel — by emitting the corresponding [`ShellEvent`]s. The dictation
//! target keeps a local mirror of the input field, updated by `input_sync`
//! commands, so transcript append/replace decisions can be made core-side.

use std::sync::{Arc, Mutex};

use super::bridge::EventSink;
use super::ShellEvent;
use crate::notify::{NotifyLevel, NotifySink};
use crate::settings::{VoiceOption, VoiceSettings};
use crate::ui::{DictationTarget, MicIndicator, MicState, SettingsPanel};

pub struct ShellBridge {
    sink: Arc<dyn EventSink>,
    input_mirror: Mutex<String>,
}

impl ShellBridge {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            input_mirror: Mutex::new(String::new()),
        }
    }

    /// Record the shell-reported content of the dictation target.
    pub fn sync_input(&self, text: &str) {
        *self.input_mirror.lock().expect("input mirror poisoned") = text.to_string();
    }
}

impl NotifySink for ShellBridge {
    fn notify(&self, level: NotifyLevel, message: &str) {
        self.sink.emit(&ShellEvent::Notification {
            level,
            message: message.to_string(),
        });
    }
}

impl MicIndicator for ShellBridge {
    fn set_state(&self, state: MicState) {
        self.sink.emit(&ShellEvent::MicState { state });
    }
}

impl DictationTarget for ShellBridge {
    fn current_text(&self) -> String {
        self.input_mirror.lock().expect("input mirror poisoned").clone()
    }

    fn set_text(&self, text: &str) {
        self.sync_input(text);
        // The shell applies the text and dispatches its input-change event.
        self.sink.emit(&ShellEvent::InputText {
            text: text.to_string(),
        });
    }
}

impl SettingsPanel for ShellBridge {
    fn show_settings(&self, settings: &VoiceSettings) {
        self.sink.emit(&ShellEvent::Settings {
            settings: settings.clone(),
        });
    }

    fn show_voice_options(&self, options: &[VoiceOption], selected: &str) {
        self.sink.emit(&ShellEvent::VoiceOptions {
            options: options.to_vec(),
            selected: selected.to_string(),
        });
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

    #[test]
    fn set_text_updates_mirror_and_emits() {
        let sink = Arc::new(Collected(Mutex::new(Vec::new())));
        let bridge = ShellBridge::new(sink.clone());

        bridge.set_text("hello world");
        assert_eq!(bridge.current_text(), "hello world");

        let events = sink.0.lock().unwrap();
        assert_eq!(
            events[0],
            ShellEvent::InputText {
                text: "hello world".to_string()
            }
        );
    }

    #[test]
    fn sync_input_does_not_echo_back() {
        let sink = Arc::new(Collected(Mutex::new(Vec::new())));
        let bridge = ShellBridge::new(sink.clone());

        bridge.sync_input("typed by user");
        assert_eq!(bridge.current_text(), "typed by user");
        assert!(sink.0.lock().unwrap().is_empty());
    }
}
