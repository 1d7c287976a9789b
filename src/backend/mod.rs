//! Backend command boundary.
//!
//! The voice core persists settings and conversation history through this
//! trait; the shipped implementation is the JSON-file backend in
//! [`file`], tests substitute an in-memory mock.

pub mod file;

use async_trait::async_trait;

use crate::error::VoiceError;
use crate::history::ConversationEntry;
use crate::settings::VoiceSettings;

/// Async request/response command surface, one outstanding call per
/// invocation, errors surfaced as rejections.
#[async_trait]
pub trait VoiceBackend: Send + Sync {
    async fn get_voice_settings(&self) -> Result<VoiceSettings, VoiceError>;

    async fn save_voice_settings(&self, settings: &VoiceSettings) -> Result<(), VoiceError>;

    async fn save_conversation(&self, entry: ConversationEntry) -> Result<(), VoiceError>;

    async fn load_conversations(&self) -> Result<Vec<ConversationEntry>, VoiceError>;

    async fn clear_conversations(&self) -> Result<(), VoiceError>;
}
