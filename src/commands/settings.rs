use crate::storage::keychain;
use crate::storage::settings_io::{app_settings_path, normalize_settings, save_settings};
use crate::types::AppSettings;
use anyhow::anyhow;
use serde_json::json;

pub fn show(settings: &AppSettings) -> anyhow::Result<()> {
    let value = json!({
        "path": app_settings_path().display().to_string(),
        "settings": settings,
        "secrets": {
            "geminiApiKey": secret_state(keychain::has_gemini_api_key()),
            "notionToken": secret_state(keychain::has_notion_token()),
        }
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn secret_state(result: Result<bool, String>) -> String {
    match result {
        Ok(true) => "set".to_string(),
        Ok(false) => "missing".to_string(),
        Err(error) => format!("unavailable ({error})"),
    }
}

/// Applies `edit`, normalizes, and persists the result.
pub fn update<F>(mut settings: AppSettings, edit: F) -> anyhow::Result<AppSettings>
where
    F: FnOnce(&mut AppSettings),
{
    edit(&mut settings);
    let settings = normalize_settings(settings);
    save_settings(&settings).map_err(|error| anyhow!(error))?;
    println!("Saved {}", app_settings_path().display());
    Ok(settings)
}

pub fn set_gemini_key(api_key: &str) -> anyhow::Result<()> {
    keychain::set_gemini_api_key(api_key).map_err(|error| anyhow!(error))?;
    println!("Gemini API key stored in the system keyring.");
    Ok(())
}

pub fn clear_gemini_key() -> anyhow::Result<()> {
    keychain::clear_gemini_api_key().map_err(|error| anyhow!(error))?;
    println!("Gemini API key removed.");
    Ok(())
}

pub fn set_notion_token(token: &str) -> anyhow::Result<()> {
    keychain::set_notion_token(token).map_err(|error| anyhow!(error))?;
    println!("Notion token stored in the system keyring.");
    Ok(())
}

pub fn clear_notion_token() -> anyhow::Result<()> {
    keychain::clear_notion_token().map_err(|error| anyhow!(error))?;
    println!("Notion token removed.");
    Ok(())
}
