use crate::error::{IntegrationError, IntegrationResult};
use crate::payload::{anki_request, build_add_note_payload, build_create_deck_payload};
use crate::types::{ConnectionStatus, FlashcardRecord, IntegrationConfig, ANKI_TIMEOUT_SECS};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration as StdDuration;

const ANKI_CONNECTION_REFUSED: &str =
    "Connection Refused. Ensure Anki is OPEN and AnkiConnect 'webCorsOriginList' includes '*'.";

/// Client for the AnkiConnect add-on's single JSON-RPC endpoint.
pub struct AnkiClient {
    endpoint: String,
    client: Client,
    create_deck_first: bool,
}

impl AnkiClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(ANKI_TIMEOUT_SECS))
            .build()
            .map_err(|error| error.to_string())?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
            create_deck_first: true,
        })
    }

    pub fn with_deck_creation(mut self, enabled: bool) -> Self {
        self.create_deck_first = enabled;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn call(&self, payload: &Value) -> IntegrationResult<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .map_err(|error| IntegrationError::Transport(error.to_string()))?;
        response
            .json::<Value>()
            .map_err(|error| IntegrationError::Decode(error.to_string()))
    }

    /// Asks AnkiConnect for its protocol version. Never returns an error:
    /// failures come back as `success == false` so callers can render a
    /// status line directly.
    pub fn check_connection(&self) -> ConnectionStatus {
        match self.call(&anki_request("version", None)) {
            Ok(value) => ConnectionStatus::connected(value.get("result").and_then(Value::as_u64)),
            Err(error) => {
                log::warn!("Anki connectivity check against {} failed: {error}", self.endpoint);
                ConnectionStatus::failed(error.to_string())
            }
        }
    }

    pub fn create_deck(&self, deck_name: &str) -> IntegrationResult<()> {
        let value = self.call(&build_create_deck_payload(deck_name))?;
        match service_error(&value) {
            Some(message) => Err(IntegrationError::Service(format!("Anki Error: {message}"))),
            None => Ok(()),
        }
    }

    pub fn add_note(&self, deck_name: &str, record: &FlashcardRecord) -> IntegrationResult<Value> {
        let value = self
            .call(&build_add_note_payload(deck_name, record))
            .map_err(|error| match error {
                IntegrationError::Transport(detail) => {
                    log::error!("Anki transport failure: {detail}");
                    IntegrationError::Transport(ANKI_CONNECTION_REFUSED.to_string())
                }
                other => other,
            })?;
        if let Some(message) = service_error(&value) {
            return Err(IntegrationError::Service(format!("Anki Error: {message}")));
        }
        Ok(value.get("result").cloned().unwrap_or(Value::Null))
    }

    /// Adds every record to the configured deck, one call at a time and in
    /// input order. The first rejected record stops the batch.
    pub fn sync_flashcards(
        &self,
        config: &IntegrationConfig,
        records: &[FlashcardRecord],
    ) -> IntegrationResult<usize> {
        let deck_name = config.require_deck()?;

        if self.create_deck_first {
            // The deck may already exist; an unreachable service surfaces on addNote.
            if let Err(error) = self.create_deck(deck_name) {
                log::debug!("Ignoring createDeck failure for '{deck_name}': {error}");
            }
        }

        let mut added = 0;
        for record in records {
            self.add_note(deck_name, record)?;
            added += 1;
        }
        log::info!("Added {added} flashcards to Anki deck '{deck_name}'");
        Ok(added)
    }
}

fn service_error(value: &Value) -> Option<String> {
    match value.get("error") {
        None | Some(Value::Null) => None,
        Some(Value::String(message)) => Some(message.clone()),
        Some(other) => Some(other.to_string()),
    }
}
