//! JSON-file backend.
//!
//! Settings and conversations live as two pretty-printed JSON files under
//! the platform config directory. Missing files read back as defaults /
//! empty; `save_conversation` trims to the configured history limit.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use super::VoiceBackend;
use crate::error::VoiceError;
use crate::history::ConversationEntry;
use crate::settings::VoiceSettings;

const SETTINGS_FILE: &str = "voice_settings.json";
const CONVERSATIONS_FILE: &str = "conversations.json";

pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Backend rooted at the platform config directory
    /// (e.g. `~/.config/voicebridge` on Linux).
    pub fn new() -> Result<Self, VoiceError> {
        let dir = dirs::config_dir()
            .ok_or_else(|| VoiceError::Backend("cannot resolve config directory".to_string()))?
            .join("voicebridge");
        Ok(Self { dir })
    }

    /// Backend rooted at an explicit directory.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    fn conversations_path(&self) -> PathBuf {
        self.dir.join(CONVERSATIONS_FILE)
    }

    async fn write_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<(), VoiceError> {
        fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_string_pretty(value)?;
        fs::write(path, json).await?;
        Ok(())
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &Path,
    ) -> Result<Option<T>, VoiceError> {
        match fs::read_to_string(path).await {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl VoiceBackend for FileBackend {
    async fn get_voice_settings(&self) -> Result<VoiceSettings, VoiceError> {
        let settings = self
            .read_json::<VoiceSettings>(&self.settings_path())
            .await?
            .unwrap_or_default();
        Ok(settings)
    }

    async fn save_voice_settings(&self, settings: &VoiceSettings) -> Result<(), VoiceError> {
        self.write_json(&self.settings_path(), settings).await?;
        info!("Voice settings saved");
        Ok(())
    }

    async fn save_conversation(&self, entry: ConversationEntry) -> Result<(), VoiceError> {
        let mut conversations = self.load_conversations().await?;
        conversations.push(entry);

        // Retention follows the stored settings, not the in-memory copy.
        let limit = self.get_voice_settings().await?.history_limit;
        if conversations.len() > limit {
            let excess = conversations.len() - limit;
            conversations.drain(..excess);
        }

        self.write_json(&self.conversations_path(), &conversations)
            .await?;
        debug!(count = conversations.len(), "Conversation entry saved");
        Ok(())
    }

    async fn load_conversations(&self) -> Result<Vec<ConversationEntry>, VoiceError> {
        let conversations = self
            .read_json::<Vec<ConversationEntry>>(&self.conversations_path())
            .await?
            .unwrap_or_default();
        Ok(conversations)
    }

    async fn clear_conversations(&self) -> Result<(), VoiceError> {
        match fs::remove_file(self.conversations_path()).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        info!("Conversation history cleared");
        Ok(())
    }
}

// ── Tests ───────────────────────────────────────────────────────────
