//! Atomic state machines for the two speech engines.
//!
//! Each machine tracks the *last engine-reported* phase; transitions happen
//! from lifecycle-event handlers, the sanctioned start-arm path, and
//! caller-confirmed cancellations. The two machines share no state — a
//! dictation session and a narration may be active at the same time.

use std::sync::atomic::{AtomicU8, Ordering};

/// Recognition phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecognitionPhase {
    /// No session active.
    Idle = 0,
    /// The engine reported a session start.
    Listening = 1,
    /// A graceful stop was requested; waiting for the terminal event.
    Stopping = 2,
}

impl RecognitionPhase {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Listening,
            2 => Self::Stopping,
            _ => Self::Idle,
        }
    }
}

impl std::fmt::Display for RecognitionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Listening => write!(f, "listening"),
            Self::Stopping => write!(f, "stopping"),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecognitionMachine {
    phase: AtomicU8,
}

impl RecognitionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RecognitionPhase {
        RecognitionPhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// A session is active (the toggle condition for `start_listening`).
    pub fn is_active(&self) -> bool {
        self.phase() != RecognitionPhase::Idle
    }

    /// Engine reported the session started.
    pub fn mark_listening(&self) {
        self.phase
            .store(RecognitionPhase::Listening as u8, Ordering::Release);
    }

    /// Graceful stop requested. Only valid while listening.
    pub fn request_stop(&self) -> bool {
        self.phase
            .compare_exchange(
                RecognitionPhase::Listening as u8,
                RecognitionPhase::Stopping as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Terminal event (end or error) returned the engine to rest.
    pub fn mark_idle(&self) {
        self.phase
            .store(RecognitionPhase::Idle as u8, Ordering::Release);
    }
}

/// Synthesis phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SynthesisPhase {
    Idle = 0,
    Speaking = 1,
    Paused = 2,
}

impl SynthesisPhase {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Speaking,
            2 => Self::Paused,
            _ => Self::Idle,
        }
    }
}

impl std::fmt::Display for SynthesisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Speaking => write!(f, "speaking"),
            Self::Paused => write!(f, "paused"),
        }
    }
}

#[derive(Debug, Default)]
pub struct SynthesisMachine {
    phase: AtomicU8,
}

impl SynthesisMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SynthesisPhase {
        SynthesisPhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// An utterance is active (speaking or paused).
    pub fn is_active(&self) -> bool {
        self.phase() != SynthesisPhase::Idle
    }

    /// Engine reported utterance start.
    pub fn mark_speaking(&self) {
        self.phase
            .store(SynthesisPhase::Speaking as u8, Ordering::Release);
    }

    /// Pause is only reachable from Speaking.
    pub fn pause(&self) -> bool {
        self.phase
            .compare_exchange(
                SynthesisPhase::Speaking as u8,
                SynthesisPhase::Paused as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Resume returns Paused to Speaking.
    pub fn resume(&self) -> bool {
        self.phase
            .compare_exchange(
                SynthesisPhase::Paused as u8,
                SynthesisPhase::Speaking as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Terminal event or confirmed cancellation.
    pub fn mark_idle(&self) {
        self.phase
            .store(SynthesisPhase::Idle as u8, Ordering::Release);
    }
}

// ── Tests ───────────────────────────────────────────────────────────
