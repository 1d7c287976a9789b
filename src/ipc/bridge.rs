//! IPC bridge: stdin reader and stdout event emitter.
//!
//! A blocking stdin reader thread sends deserialized commands through an
//! mpsc channel; events go out through the [`EventSink`] trait so the
//! emitting side can be substituted in tests.

use std::io::{self, BufRead, Write};

use tokio::sync::mpsc;
use tracing::{debug, error};

use super::{ShellCommand, ShellEvent};

/// Destination for outbound shell events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &ShellEvent);
}

/// Production sink: one JSON line per event on stdout, flushed.
pub struct StdoutEvents;

impl EventSink for StdoutEvents {
    fn emit(&self, event: &ShellEvent) {
        let json = match serde_json::to_string(event) {
            Ok(j) => j,
            Err(e) => {
                error!("Failed to serialize event: {}", e);
                return;
            }
        };
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        // Ignore write/flush errors — pipe may be closed.
        let _ = writeln!(handle, "{}", json);
        let _ = handle.flush();
    }
}

/// Spawn a blocking thread that reads JSON lines from stdin, deserializes
/// them into [`ShellCommand`], and forwards them through the returned
/// channel.
///
/// The thread exits when stdin is closed (shell process gone) or on
/// unrecoverable read error.
pub fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<ShellCommand> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        let stdin = io::stdin();
        let reader = stdin.lock();
        for line in reader.lines() {
            match line {
                Ok(text) => {
                    let trimmed = text.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<ShellCommand>(trimmed) {
                        Ok(cmd) => {
                            debug!(?cmd, "Received command from shell");
                            if tx.send(cmd).is_err() {
                                break; // Receiver dropped — main task is gone.
                            }
                        }
                        Err(e) => {
                            error!("Invalid JSON command: {} — input: {}", e, trimmed);
                        }
                    }
                }
                Err(e) => {
                    error!("stdin read error: {}", e);
                    break; // stdin closed
                }
            }
        }
        debug!("stdin reader thread exiting");
    });

    rx
}
