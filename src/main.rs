//! voicebridge — voice core of the desktop chat client.
//!
//! Communicates with the UI shell via JSON-line IPC on stdin/stdout: the
//! shell forwards user triggers and its speech engines' lifecycle
//! callbacks as commands, the core answers with engine control requests
//! and UI updates as events. This is the entry point that wires the
//! manager to its collaborators and runs the command loop.

mod backend;
mod error;
mod history;
mod ipc;
mod logging;
mod manager;
mod notify;
mod settings;
mod speech;
mod ui;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use backend::file::FileBackend;
use ipc::bridge::{spawn_stdin_reader, EventSink, StdoutEvents};
use ipc::shell::ShellBridge;
use ipc::{ShellCommand, ShellEvent};
use manager::{UiBindings, VoiceManager};
use speech::remote::{RemoteRecognizer, RemoteSynthesizer};
use speech::{RecognitionEvent, SpeakOptions, SpeechRecognizer, SpeechSynthesizer, SynthesisEvent};

/// Everything that exists only after the shell's capability handshake.
struct App {
    manager: VoiceManager,
    bridge: Arc<ShellBridge>,
    synthesizer: Option<Arc<RemoteSynthesizer>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let sink: Arc<dyn EventSink> = Arc::new(StdoutEvents);

    // Tell the shell we are alive before doing anything slow.
    sink.emit(&ShellEvent::Starting {});

    let backend = Arc::new(FileBackend::new().context("failed to initialize file backend")?);

    let mut cmd_rx = spawn_stdin_reader();
    let mut app: Option<App> = None;

    // Main loop: process commands from the shell until stdin closes or a
    // stop command arrives.
    loop {
        let Some(cmd) = cmd_rx.recv().await else {
            info!("stdin closed, shutting down");
            break;
        };

        match cmd {
            ShellCommand::Ping {} => sink.emit(&ShellEvent::Pong {}),

            ShellCommand::Stop {} => {
                sink.emit(&ShellEvent::Stopping {});
                break;
            }

            ShellCommand::Init {
                recognition_supported,
                synthesis_supported,
            } => {
                app = Some(init_app(&sink, backend.clone(), recognition_supported, synthesis_supported).await);
                sink.emit(&ShellEvent::Ready {
                    recognition: recognition_supported,
                    synthesis: synthesis_supported,
                });
                info!(
                    recognition = recognition_supported,
                    synthesis = synthesis_supported,
                    "Voice core ready"
                );
            }

            cmd => match app.as_mut() {
                Some(app) => dispatch(app, &sink, cmd).await,
                None => warn!(?cmd, "Command received before init, ignoring"),
            },
        }
    }

    info!("Voice core shutting down");
    Ok(())
}

/// Build the manager and its collaborators from the capability handshake.
async fn init_app(
    sink: &Arc<dyn EventSink>,
    backend: Arc<FileBackend>,
    recognition_supported: bool,
    synthesis_supported: bool,
) -> App {
    let bridge = Arc::new(ShellBridge::new(sink.clone()));

    let recognizer = recognition_supported
        .then(|| Arc::new(RemoteRecognizer::new(sink.clone())) as Arc<dyn SpeechRecognizer>);
    let synthesizer = synthesis_supported.then(|| Arc::new(RemoteSynthesizer::new(sink.clone())));

    let mut manager = VoiceManager::new(
        recognizer,
        synthesizer
            .clone()
            .map(|s| s as Arc<dyn SpeechSynthesizer>),
        backend,
        UiBindings {
            notifier: bridge.clone(),
            mic: bridge.clone(),
            target: bridge.clone(),
            panel: bridge.clone(),
        },
    );
    manager.load_settings().await;

    App {
        manager,
        bridge,
        synthesizer,
    }
}

/// Route one post-init command to the manager.
async fn dispatch(app: &mut App, sink: &Arc<dyn EventSink>, cmd: ShellCommand) {
    match cmd {
        // User triggers
        ShellCommand::ToggleDictation {} => app.manager.start_listening(),
        ShellCommand::StopDictation {} => app.manager.stop_listening(),
        ShellCommand::Speak {
            text,
            rate,
            pitch,
            volume,
        } => app.manager.speak(&text, SpeakOptions { rate, pitch, volume }),
        ShellCommand::StopSpeaking {} => app.manager.stop_speaking(),
        ShellCommand::PauseSpeaking {} => app.manager.pause_speaking(),
        ShellCommand::ResumeSpeaking {} => app.manager.resume_speaking(),

        // Settings
        ShellCommand::GetSettings {} => sink.emit(&ShellEvent::Settings {
            settings: app.manager.settings().clone(),
        }),
        ShellCommand::UpdateSettings { settings } => app.manager.update_settings(settings).await,
        ShellCommand::OpenSettings {} => app.manager.open_settings_panel(),
        ShellCommand::GetStatus {} => sink.emit(&ShellEvent::Status {
            listening: app.manager.is_listening(),
            speaking: app.manager.is_speaking(),
        }),

        // History
        ShellCommand::AssistantResponse {
            user_input,
            text,
            voice_used,
        } => {
            app.manager
                .handle_assistant_response(&user_input, &text, voice_used)
                .await
        }
        ShellCommand::SaveConversation {
            user_input,
            assistant_response,
            voice_used,
        } => {
            app.manager
                .save_conversation(&user_input, &assistant_response, voice_used)
                .await
        }
        ShellCommand::LoadConversations {} => {
            let entries = app.manager.load_conversations().await;
            sink.emit(&ShellEvent::Conversations { entries });
        }
        ShellCommand::ClearConversations {} => app.manager.clear_conversations().await,

        ShellCommand::InputSync { text } => app.bridge.sync_input(&text),

        // Recognition engine lifecycle
        ShellCommand::RecognitionStarted {} => {
            app.manager.on_recognition_event(RecognitionEvent::Started)
        }
        ShellCommand::RecognitionResult { fragments } => app
            .manager
            .on_recognition_event(RecognitionEvent::Result { fragments }),
        ShellCommand::RecognitionError { code } => app
            .manager
            .on_recognition_event(RecognitionEvent::Error { code }),
        ShellCommand::RecognitionEnded {} => {
            app.manager.on_recognition_event(RecognitionEvent::Ended)
        }

        // Synthesis engine lifecycle
        ShellCommand::SynthesisStarted { id } => {
            app.manager.on_synthesis_event(SynthesisEvent::Started { id })
        }
        ShellCommand::SynthesisEnded { id } => {
            app.manager.on_synthesis_event(SynthesisEvent::Ended { id })
        }
        ShellCommand::SynthesisError { id, message } => app
            .manager
            .on_synthesis_event(SynthesisEvent::Error { id, message }),
        ShellCommand::VoicesChanged { voices } => {
            // Keep the synchronous catalog query current before the manager
            // reacts to the change.
            if let Some(synthesizer) = &app.synthesizer {
                synthesizer.set_voices(voices.clone());
            }
            app.manager
                .on_synthesis_event(SynthesisEvent::VoicesChanged { voices });
        }

        // Handled by the main loop before dispatch.
        ShellCommand::Init { .. } | ShellCommand::Ping {} | ShellCommand::Stop {} => {}
    }
}
