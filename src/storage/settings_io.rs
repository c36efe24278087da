use crate::types::{
    default_anki_endpoint, default_chat_model, default_notion_endpoint,
    default_proxy_port, default_temperature, default_upstream_url, AppSettings, SETTINGS_DIR_NAME,
    SETTINGS_FILE_NAME,
};
use crate::util::write_atomic;
use std::fs;
use std::path::{Path, PathBuf};

pub fn app_settings_path() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME)
}

pub fn load_settings() -> AppSettings {
    load_settings_from(&app_settings_path())
}

pub fn save_settings(settings: &AppSettings) -> Result<(), String> {
    save_settings_to(&app_settings_path(), settings)
}

/// A missing or unreadable file yields defaults rather than an error.
pub fn load_settings_from(path: &Path) -> AppSettings {
    if !path.exists() {
        return AppSettings::default();
    }

    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppSettings>(&content) {
            Ok(settings) => normalize_settings(settings),
            Err(error) => {
                log::warn!("Ignoring malformed settings at {}: {error}", path.display());
                AppSettings::default()
            }
        },
        Err(error) => {
            log::warn!("Cannot read settings at {}: {error}", path.display());
            AppSettings::default()
        }
    }
}

pub fn save_settings_to(path: &Path, settings: &AppSettings) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|error| error.to_string())?;
    }
    let bytes = serde_json::to_vec_pretty(settings).map_err(|error| error.to_string())?;
    write_atomic(path, &bytes).map_err(|error| error.to_string())
}

pub fn normalize_settings(mut settings: AppSettings) -> AppSettings {
    // The deck name may be blanked on purpose to disable Anki sync.
    settings.anki.deck_name = settings.anki.deck_name.trim().to_string();
    settings.anki.endpoint = non_blank_or(settings.anki.endpoint, default_anki_endpoint);

    settings.notion.database_id = settings.notion.database_id.trim().to_string();
    settings.notion.endpoint = non_blank_or(settings.notion.endpoint, default_notion_endpoint);

    settings.chat.model = non_blank_or(settings.chat.model, default_chat_model);
    if !settings.chat.temperature.is_finite() || !(0.0..=2.0).contains(&settings.chat.temperature) {
        settings.chat.temperature = default_temperature();
    }

    if settings.proxy.port == 0 {
        settings.proxy.port = default_proxy_port();
    }
    settings.proxy.upstream_url = non_blank_or(settings.proxy.upstream_url, default_upstream_url);

    settings.streak.last_visit = settings
        .streak
        .last_visit
        .and_then(crate::util::option_non_empty);

    settings
}

fn non_blank_or(value: String, fallback: fn() -> String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback()
    } else {
        trimmed.to_string()
    }
}
