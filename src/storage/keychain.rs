use crate::types::{AppSettings, IntegrationConfig, APP_SERVICE, GEMINI_USERNAME, NOTION_USERNAME};
use keyring::{Entry, Error as KeyringError};

fn keyring_entry(username: &str) -> Result<Entry, String> {
    Entry::new(APP_SERVICE, username).map_err(|error| error.to_string())
}

fn set_secret(username: &str, value: &str) -> Result<bool, String> {
    if value.trim().is_empty() {
        return Err("API key cannot be empty".to_string());
    }

    let entry = keyring_entry(username)?;
    entry
        .set_password(value.trim())
        .map_err(|error| error.to_string())?;
    Ok(true)
}

fn has_secret(username: &str) -> Result<bool, String> {
    match keyring_entry(username)?.get_password() {
        Ok(value) => Ok(!value.trim().is_empty()),
        Err(KeyringError::NoEntry) => Ok(false),
        Err(error) => Err(error.to_string()),
    }
}

fn clear_secret(username: &str) -> Result<bool, String> {
    match keyring_entry(username)?.delete_password() {
        Ok(_) => Ok(true),
        Err(KeyringError::NoEntry) => Ok(true),
        Err(error) => Err(error.to_string()),
    }
}

fn resolve_secret(username: &str, provided: Option<String>, missing: &str) -> Result<String, String> {
    if let Some(value) = provided {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }

    match keyring_entry(username)?.get_password() {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        Ok(_) | Err(KeyringError::NoEntry) => Err(missing.to_string()),
        Err(error) => Err(error.to_string()),
    }
}

pub fn set_gemini_api_key(api_key: &str) -> Result<bool, String> {
    set_secret(GEMINI_USERNAME, api_key)
}

pub fn has_gemini_api_key() -> Result<bool, String> {
    has_secret(GEMINI_USERNAME)
}

pub fn clear_gemini_api_key() -> Result<bool, String> {
    clear_secret(GEMINI_USERNAME)
}

pub fn resolve_gemini_api_key(api_key: Option<String>) -> Result<String, String> {
    resolve_secret(
        GEMINI_USERNAME,
        api_key,
        "Missing Gemini API key. Run `cybersentinel config set-gemini-key <KEY>` first.",
    )
}

pub fn set_notion_token(token: &str) -> Result<bool, String> {
    set_secret(NOTION_USERNAME, token)
}

pub fn has_notion_token() -> Result<bool, String> {
    has_secret(NOTION_USERNAME)
}

pub fn clear_notion_token() -> Result<bool, String> {
    clear_secret(NOTION_USERNAME)
}

pub fn resolve_notion_token(token: Option<String>) -> Result<String, String> {
    resolve_secret(
        NOTION_USERNAME,
        token,
        "Missing Notion token. Run `cybersentinel config set-notion-token <TOKEN>` first.",
    )
}

/// Assembles the session's integration settings. An unresolvable token is
/// left empty so that Notion sync reports a configuration error when used.
pub fn resolve_integration_config(settings: &AppSettings, notion_token: Option<String>) -> IntegrationConfig {
    let notes_api_token = resolve_notion_token(notion_token).unwrap_or_else(|error| {
        log::debug!("Notion sync disabled: {error}");
        String::new()
    });
    integration_config_from(settings, notes_api_token)
}

pub(crate) fn integration_config_from(settings: &AppSettings, notes_api_token: String) -> IntegrationConfig {
    IntegrationConfig {
        flashcard_deck_name: settings.anki.deck_name.clone(),
        notes_api_token,
        notes_database_id: settings.notion.database_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_secret_wins_over_keyring() {
        let token = resolve_notion_token(Some("  secret_from_flag ".to_string())).expect("explicit token");
        assert_eq!(token, "secret_from_flag");
    }

    #[test]
    fn empty_secret_is_rejected_before_keyring() {
        let error = set_gemini_api_key("   ").expect_err("blank key");
        assert_eq!(error, "API key cannot be empty");
    }

    #[test]
    fn integration_config_copies_settings_fields() {
        let mut settings = AppSettings::default();
        settings.notion.database_id = "db-7".to_string();
        let config = integration_config_from(&settings, "tok".to_string());

        assert_eq!(config.flashcard_deck_name, "CyberSentinel");
        assert_eq!(config.notes_database_id, "db-7");
        assert!(config.notes_enabled());
    }
}
