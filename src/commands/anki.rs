use crate::parser::parse_flashcards;
use crate::providers::anki::AnkiClient;
use crate::types::{AppSettings, ConnectionStatus, IntegrationConfig};
use anyhow::anyhow;

pub fn check(settings: &AppSettings) -> anyhow::Result<ConnectionStatus> {
    let client = AnkiClient::new(settings.anki.endpoint.clone()).map_err(|error| anyhow!(error))?;
    let status = client.check_connection();
    if status.success {
        println!(
            "Anki reachable at {} (AnkiConnect version {})",
            client.endpoint(),
            status
                .version
                .map(|version| version.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );
    } else {
        println!(
            "Anki unreachable at {}: {}",
            client.endpoint(),
            status.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(status)
}

pub fn sync(settings: &AppSettings, config: &IntegrationConfig, text: &str, skip_deck: bool) -> anyhow::Result<usize> {
    let cards = parse_flashcards(text);
    if cards.is_empty() {
        println!("No flashcards found.");
        return Ok(0);
    }

    let client = AnkiClient::new(settings.anki.endpoint.clone())
        .map_err(|error| anyhow!(error))?
        .with_deck_creation(!skip_deck);
    let added = client.sync_flashcards(config, &cards)?;
    println!("Synced {added} cards to Anki deck '{}'.", config.flashcard_deck_name.trim());
    Ok(added)
}
