use crate::error::{IntegrationError, IntegrationResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const APP_SERVICE: &str = "com.cybersentinel.app";
pub const GEMINI_USERNAME: &str = "gemini_api_key";
pub const NOTION_USERNAME: &str = "notion_api_key";
pub const SETTINGS_DIR_NAME: &str = "cybersentinel";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

pub const APP_TAG: &str = "CyberSentinel";
pub const ANKI_CONNECT_URL: &str = "http://127.0.0.1:8765";
pub const ANKI_CONNECT_VERSION: u32 = 6;
pub const ANKI_BASIC_MODEL: &str = "Basic";
pub const ANKI_TIMEOUT_SECS: u64 = 30;

pub const NOTION_API_VERSION: &str = "2022-06-28";
pub const NOTION_PAGES_URL: &str = "https://api.notion.com/v1/pages";
pub const NOTION_TIMEOUT_SECS: u64 = 50;
pub const NOTION_RICH_TEXT_LIMIT: usize = 2000;

pub const DEFAULT_PROXY_PORT: u16 = 3000;
pub const PROXY_PAGES_ROUTE: &str = "/v1/pages";

pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const GEMINI_TIMEOUT_SECS: u64 = 120;

/// One front/back/tags triple destined for the flashcard service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardRecord {
    pub front: String,
    pub back: String,
    pub tags: Vec<String>,
}

/// A structural unit of a translated note document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "camelCase")]
pub enum Block {
    Heading(String),
    BoldParagraph(String),
    BulletItem(String),
    Paragraph(String),
}

impl Block {
    pub fn text(&self) -> &str {
        match self {
            Block::Heading(text)
            | Block::BoldParagraph(text)
            | Block::BulletItem(text)
            | Block::Paragraph(text) => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDocument {
    pub title: String,
    pub body_blocks: Vec<Block>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrationConfig {
    pub flashcard_deck_name: String,
    pub notes_api_token: String,
    pub notes_database_id: String,
}

impl IntegrationConfig {
    pub fn require_deck(&self) -> IntegrationResult<&str> {
        let deck = self.flashcard_deck_name.trim();
        if deck.is_empty() {
            return Err(IntegrationError::Config(
                "Anki Deck Name not configured.".to_string(),
            ));
        }
        Ok(deck)
    }

    /// Returns `(token, database_id)`; both are required together.
    pub fn require_notes_credentials(&self) -> IntegrationResult<(&str, &str)> {
        let token = self.notes_api_token.trim();
        let database_id = self.notes_database_id.trim();
        if token.is_empty() || database_id.is_empty() {
            return Err(IntegrationError::Config(
                "Notion credentials missing.".to_string(),
            ));
        }
        Ok((token, database_id))
    }

    pub fn flashcards_enabled(&self) -> bool {
        self.require_deck().is_ok()
    }

    pub fn notes_enabled(&self) -> bool {
        self.require_notes_credentials().is_ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub success: bool,
    pub version: Option<u64>,
    pub error: Option<String>,
}

impl ConnectionStatus {
    pub fn connected(version: Option<u64>) -> Self {
        Self {
            success: true,
            version,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            version: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageRole {
    User,
    Model,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: MessageRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnkiSettings {
    #[serde(default = "default_deck_name")]
    pub deck_name: String,
    #[serde(default = "default_anki_endpoint")]
    pub endpoint: String,
}

impl Default for AnkiSettings {
    fn default() -> Self {
        Self {
            deck_name: default_deck_name(),
            endpoint: default_anki_endpoint(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotionSettings {
    #[serde(default)]
    pub database_id: String,
    #[serde(default = "default_notion_endpoint")]
    pub endpoint: String,
}

impl Default for NotionSettings {
    fn default() -> Self {
        Self {
            database_id: String::new(),
            endpoint: default_notion_endpoint(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatSettings {
    #[serde(default = "default_chat_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: default_chat_model(),
            temperature: default_temperature(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProxySettings {
    #[serde(default = "default_proxy_port")]
    pub port: u16,
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            port: default_proxy_port(),
            upstream_url: default_upstream_url(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    #[serde(default)]
    pub count: u32,
    /// `YYYY-MM-DD` of the last session start.
    #[serde(default)]
    pub last_visit: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default)]
    pub anki: AnkiSettings,
    #[serde(default)]
    pub notion: NotionSettings,
    #[serde(default)]
    pub chat: ChatSettings,
    #[serde(default)]
    pub proxy: ProxySettings,
    #[serde(default)]
    pub streak: StreakState,
}

pub(crate) fn default_deck_name() -> String {
    APP_TAG.to_string()
}

pub(crate) fn default_anki_endpoint() -> String {
    ANKI_CONNECT_URL.to_string()
}

pub(crate) fn default_notion_endpoint() -> String {
    format!("http://localhost:{DEFAULT_PROXY_PORT}{PROXY_PAGES_ROUTE}")
}

pub(crate) fn default_chat_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

pub(crate) fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

pub(crate) fn default_proxy_port() -> u16 {
    DEFAULT_PROXY_PORT
}

pub(crate) fn default_upstream_url() -> String {
    NOTION_PAGES_URL.to_string()
}
