//! Conversation history entries.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One completed user/assistant exchange.
///
/// Created at the moment an exchange completes and never mutated by this
/// core afterwards; retention belongs to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub id: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub user_input: String,
    pub assistant_response: String,
    /// Whether the user input came in via dictation.
    pub voice_used: bool,
    /// Whether the response has been narrated; always starts false.
    pub played_back: bool,
}

impl ConversationEntry {
    pub fn new(user_input: &str, assistant_response: &str, voice_used: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().timestamp_millis(),
            user_input: user_input.to_string(),
            assistant_response: assistant_response.to_string(),
            voice_used,
            played_back: false,
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────
